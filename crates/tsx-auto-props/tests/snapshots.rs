//! Snapshot tests of rewritten output.

use vue_tsx_auto_props::transform;

fn render(source: &str) -> String {
    match transform(source) {
        Ok(Some(result)) => result.code,
        Ok(None) => "<unchanged>".to_string(),
        Err(err) => format!("<error> {err}"),
    }
}

#[test]
fn test_sibling_components() {
    let source = r#"import { defineComponent } from "vue";

interface Props<T> {
  a: number;
  b: {
    some: boolean
  }
}

type P1 = {
  a: 1
}

const Foo = defineComponent(
  <T,>(props: P1<T>) => {
    return <div>{props}</div>;
  },
);

const Bar = defineComponent(
  <T,>(props: Props<T>) => {
    return <div>{props}</div>;
  },
);
"#;

    insta::assert_snapshot!(render(source), @r#"
import { defineComponent } from "vue";

interface Props<T> {
  a: number;
  b: {
    some: boolean
  }
}

type P1 = {
  a: 1
}

const Foo = defineComponent(
  <T,>(props: P1<T>) => {
    return <div>{props}</div>;
  },
);
Object.defineProperty(Foo, "props", {
  value: ["a"],
});

const Bar = defineComponent(
  <T,>(props: Props<T>) => {
    return <div>{props}</div>;
  },
);
Object.defineProperty(Bar, "props", {
  value: ["a","b"],
});
"#);
}

#[test]
fn test_default_export_is_not_rewritten() {
    let source = r#"import { defineComponent } from "vue";

interface Props<T> {
  a: number;
}

export default defineComponent(
  <T,>(props: Props<T>) => {
    return <div>{props}</div>;
  },
);
"#;

    insta::assert_snapshot!(render(source), @"<unchanged>");
}

#[test]
fn test_setup_option() {
    let source = r#"import { defineComponent } from "vue";

type Props = {
  foo: number
}

const Foo = defineComponent({
  setup(props: Props) {
    return () => <div>{props}</div>;
  },
});"#;

    insta::assert_snapshot!(render(source), @r#"
import { defineComponent } from "vue";

type Props = {
  foo: number
}

const Foo = defineComponent({
  setup(props: Props) {
    return () => <div>{props}</div>;
  },
});
Object.defineProperty(Foo, "props", {
  value: ["foo"],
});
"#);
}

#[test]
fn test_conditional_type_is_not_rewritten() {
    let source = r#"import { defineComponent } from "vue";

type Props = 1 extends 1 ? {
  foo: number
} : { a: string }

const Foo = defineComponent({
  setup(props: Props) {
    return () => <div>{props}</div>;
  },
});"#;

    insta::assert_snapshot!(render(source), @"<unchanged>");
}

#[test]
fn test_unterminated_declarations() {
    let source = r#"import { defineComponent } from "vue"
type Props = { title: string }
export const Card = defineComponent((props: Props) => () => <h1>{props.title}</h1>)
export const n = 1
"#;

    insta::assert_snapshot!(render(source), @r#"
import { defineComponent } from "vue"
type Props = { title: string }
export const Card = defineComponent((props: Props) => () => <h1>{props.title}</h1>);
Object.defineProperty(Card, "props", {
  value: ["title"],
});
export const n = 1
"#);
}

#[test]
fn test_aliased_factory_with_type_argument() {
    let source = r#"import { defineComponent as component } from "vue";

export const Panel = component<{ "aria-label": string; open: boolean; toggle(): void }>({
  name: "Panel",
});
"#;

    insta::assert_snapshot!(render(source), @r#"
import { defineComponent as component } from "vue";

export const Panel = component<{ "aria-label": string; open: boolean; toggle(): void }>({
  name: "Panel",
});
Object.defineProperty(Panel, "props", {
  value: ["aria-label","open","toggle"],
});
"#);
}

#[test]
fn test_explicit_props_option_wins() {
    let source = r#"import { defineComponent } from "vue";

type Props = { foo: number };

export const WithProps = defineComponent({
  props: ["foo"],
  setup(props: Props) {
    return () => <span>{props.foo}</span>;
  },
});

export const WithOptions = defineComponent(
  (props: Props) => () => <span>{props.foo}</span>,
  { props: ["foo"] },
);
"#;

    insta::assert_snapshot!(render(source), @"<unchanged>");
}
