use minijinja::context;
use swagger_stencil::render::{HelperSet, TemplateRenderer};
use swagger_stencil::GenError;

fn render(source: &str, ctx: minijinja::Value) -> Result<String, GenError> {
    let mut renderer = TemplateRenderer::new(&HelperSet::builtin());
    renderer.compile("t", source.to_string())?;
    renderer.template("t")?.render(ctx, "item")
}

#[test]
fn test_array_contains_branches() {
    let src = "{% call(c, ok) arrayContains(list, needle) %}{{ 'yes' if ok else 'no' }}{% endcall %}";
    assert_eq!(render(src, context! { list => vec!["a", "b"], needle => "b" }).unwrap(), "yes");
    assert_eq!(render(src, context! { list => vec!["a", "b"], needle => "z" }).unwrap(), "no");
    assert_eq!(render(src, context! { list => "ab", needle => "a" }).unwrap(), "no");
}

#[test]
fn test_compare_operators() {
    let src = "{% call(c, ok) compare(l, op, r) %}{{ 'true' if ok else 'false' }}{% endcall %}";
    let cases = [
        (context! { l => 1, op => "<", r => 2 }, "true"),
        (context! { l => "b", op => ">=", r => "a" }, "true"),
        (context! { l => 3, op => "!=", r => 3 }, "false"),
        (context! { l => "x", op => "typeof", r => "string" }, "true"),
        (context! { l => 1, op => "===", r => "1" }, "false"),
    ];
    for (ctx, expected) in cases {
        assert_eq!(render(src, ctx).unwrap(), expected);
    }
}

#[test]
fn test_compare_unknown_operator_fails_render() {
    let src = "{% call(c, ok) compare(1, '<>', 2) %}{{ 'true' if ok else 'false' }}{% endcall %}";
    let err = render(src, context! {}).unwrap_err();
    match err {
        GenError::TemplateRender { template, item, .. } => {
            assert_eq!(template, "t");
            assert_eq!(item, "item");
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn test_text_helpers() {
    let ctx = context! { name => "listPetsByOwner" };
    assert_eq!(
        render("{% call upperFirst() %}{{ name }}{% endcall %}", ctx.clone()).unwrap(),
        "ListPetsByOwner"
    );
    assert_eq!(
        render("{% call lowerFirst() %}ABC{% endcall %}", ctx.clone()).unwrap(),
        "aBC"
    );
    assert_eq!(
        render("{% call capsplit('_') %}{{ name }}{% endcall %}", ctx.clone()).unwrap(),
        "list_Pets_By_Owner"
    );
    assert_eq!(
        render("{% call uppercase() %}{{ name }}{% endcall %}", ctx).unwrap(),
        "LISTPETSBYOWNER"
    );
}

#[test]
fn test_property_exposes_dashed_field() {
    let op = minijinja::Value::from_serialize(serde_json::json!({
        "operationId": "listPets",
        "x-swagger-router-controller": "Pets"
    }));
    let src = "{% call(c, ok) property(op, 'x-swagger-router-controller', 'controller') %}\
               {% if ok %}{{ c.controller }}/{{ c.operationId }}{% else %}none{% endif %}{% endcall %}";
    assert_eq!(render(src, context! { op => op.clone() }).unwrap(), "Pets/listPets");

    let missing = "{% call(c, ok) property(op, 'x-missing', 'm') %}{{ 'some' if ok else 'none' }}{% endcall %}";
    assert_eq!(render(missing, context! { op }).unwrap(), "none");
}

#[test]
fn test_with_context_truthiness() {
    let src = "{% call(c, ok) withContext(v) %}{{ 'true' if ok else 'false' }}:{{ c.name }}{% endcall %}";
    assert_eq!(render(src, context! { v => context! { name => "pet" } }).unwrap(), "true:pet");
    assert_eq!(render(src, context! { v => false }).unwrap(), "false:");
}

#[test]
fn test_with_context_empty_collections_take_primary() {
    let src = "{% call(c, ok) withContext(v) %}{{ 'P' if ok else 'A' }}{% endcall %}";
    let empty = std::collections::BTreeMap::<String, String>::new();
    assert_eq!(render(src, context! { v => empty }).unwrap(), "P");
    assert_eq!(render(src, context! { v => Vec::<String>::new() }).unwrap(), "P");
    assert_eq!(render(src, context! { v => "" }).unwrap(), "A");
    assert_eq!(render(src, context! {}).unwrap(), "A");
}

#[test]
fn test_with_def_resolves_references() {
    let definitions = minijinja::Value::from_serialize(serde_json::json!({
        "#/definitions/Pet": {"definitionName": "Pet", "referencePath": "#/definitions/Pet"}
    }));
    let src = "{% call(d, ok) withDef(prop, defs) %}{{ d.definitionName if ok else 'plain' }}{% endcall %}";
    let by_ref = serde_json::json!({"$ref": "#/definitions/Pet"});
    assert_eq!(
        render(src, context! { prop => by_ref, defs => definitions.clone() }).unwrap(),
        "Pet"
    );
    assert_eq!(
        render(src, context! { prop => "#/definitions/Pet", defs => definitions.clone() }).unwrap(),
        "Pet"
    );
    assert_eq!(
        render(src, context! { prop => "#/definitions/Tag", defs => definitions }).unwrap(),
        "plain"
    );
}
