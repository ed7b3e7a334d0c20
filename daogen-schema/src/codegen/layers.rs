//! Source file builders, one per layer

use super::ir::{ConstItem, Function, ImplBlock, Item, SourceFile, StructField, StructItem};
use super::templates::Templates;
use crate::descriptor::{Layer, ModuleDescriptor};
use crate::field::Field;
use crate::{Result, SchemaError};
use serde::Serialize;

const PRELUDE: &str = "daogen::prelude::*";
const SERDE_CRATE: &str = "serde(crate = \"daogen::serde\")";
const SERDE_CRATE_DEFAULT: &str = "serde(crate = \"daogen::serde\", default)";
const TYPE_CRATES: [&str; 3] = ["chrono", "rust_decimal", "serde_json"];
const PAGE_FIELDS: [(&str, &str); 3] = [
    ("page_num", "page"),
    ("page_start", "start"),
    ("page_size", "size"),
];

#[derive(Debug, Serialize)]
struct FieldContext {
    ident: String,
    field_name: String,
    column_literal: String,
    constant_name: String,
    accessor: &'static str,
    base_type: &'static str,
    zero_literal: &'static str,
    has_zero: bool,
    /// Parameter bound for an unset field when empty fields are included
    unset_value: String,
    /// Local binding used when the field is a key
    local: String,
}

impl FieldContext {
    fn new(field: &Field, index: usize) -> Self {
        let unset_value = match &field.default {
            Some(default) => format!("SqlValue::String({:?}.to_string())", default),
            None => "SqlValue::Null".to_string(),
        };
        Self {
            ident: field.ident.clone(),
            field_name: field.field_name.clone(),
            column_literal: format!("{:?}", field.column_name),
            constant_name: field.constant_name.clone(),
            accessor: field.mapping.accessor,
            base_type: field.base_type(),
            zero_literal: field.zero_literal(),
            has_zero: field.mapping.has_zero(),
            unset_value,
            local: format!("key{}", index),
        }
    }
}

/// Values shared by every body template of one table
#[derive(Debug, Serialize)]
struct LayerContext {
    table_name: String,
    model_type: String,
    model_module: String,
    dao_module: String,
    fields: Vec<FieldContext>,
    keys: Vec<FieldContext>,
    first_key: FieldContext,
    /// Rust string literal of the primary-key `where` clause
    key_where_literal: String,
}

impl LayerContext {
    fn new(descriptor: &ModuleDescriptor) -> Result<Self> {
        let first = descriptor
            .primary_key_fields
            .first()
            .ok_or_else(|| SchemaError::NoPrimaryKey(descriptor.table_name.clone()))?;
        let clause = descriptor
            .primary_key_fields
            .iter()
            .map(|f| format!("`{}` = ?", f.column_name))
            .collect::<Vec<_>>()
            .join(" and ");

        Ok(Self {
            table_name: descriptor.table_name.clone(),
            model_type: descriptor.type_name(Layer::Model),
            model_module: descriptor.target(Layer::Model).stem.clone(),
            dao_module: descriptor.target(Layer::Dao).stem.clone(),
            fields: descriptor
                .fields
                .iter()
                .enumerate()
                .map(|(i, f)| FieldContext::new(f, i))
                .collect(),
            keys: descriptor
                .primary_key_fields
                .iter()
                .enumerate()
                .map(|(i, f)| FieldContext::new(f, i))
                .collect(),
            first_key: FieldContext::new(first, 0),
            key_where_literal: format!("{:?}", clause),
        })
    }
}

/// Extra values for the by-primary-key statement templates
#[derive(Serialize)]
struct KeyedContext<'a> {
    #[serde(flatten)]
    layer: &'a LayerContext,
    /// Statement prefix up to the table name
    verb: &'a str,
    delegate: &'a str,
    /// Result for an empty key list
    empty: &'a str,
}

/// Build the source file of `layer` for `descriptor`
pub fn build(templates: &Templates, descriptor: &ModuleDescriptor, layer: Layer) -> Result<SourceFile> {
    let ctx = LayerContext::new(descriptor)?;
    let mut file = match layer {
        Layer::Model => model(templates, descriptor, &ctx)?,
        Layer::Extend => extend(descriptor),
        Layer::View => view(templates, descriptor, &ctx)?,
        Layer::Param => param(descriptor)?,
        Layer::Dao => dao(templates, descriptor, &ctx)?,
        Layer::Service => service(templates, descriptor, &ctx)?,
        Layer::Controller => controller(descriptor),
    };
    file.header = header(descriptor, layer);
    Ok(file)
}

fn header(descriptor: &ModuleDescriptor, layer: Layer) -> Vec<String> {
    let policy = if layer.is_regenerated() {
        "Regenerated on every run; edits to this file are discarded."
    } else {
        "Written once; daogen leaves this file alone after it exists."
    };
    vec![
        format!("Code generated by daogen from table `{}`.", descriptor.table_name),
        policy.to_string(),
    ]
}

fn doc_of(field: &Field) -> Option<String> {
    let comment = field.comment.trim();
    (!comment.is_empty()).then(|| comment.to_string())
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// `use daogen::<crate>` for each re-exported crate the fields name
fn type_crate_uses(fields: &[Field]) -> Vec<String> {
    TYPE_CRATES
        .iter()
        .filter(|krate| {
            let prefix = format!("{}::", krate);
            fields.iter().any(|f| f.base_type().starts_with(&prefix))
        })
        .map(|krate| format!("daogen::{}", krate))
        .collect()
}

fn key_params(descriptor: &ModuleDescriptor) -> Vec<String> {
    descriptor
        .primary_key_fields
        .iter()
        .map(|f| format!("{}: {}", f.ident, f.base_type()))
        .collect()
}

fn key_args(descriptor: &ModuleDescriptor) -> String {
    descriptor
        .primary_key_fields
        .iter()
        .map(|f| f.ident.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn model(templates: &Templates, descriptor: &ModuleDescriptor, ctx: &LayerContext) -> Result<SourceFile> {
    let model_type = descriptor.type_name(Layer::Model);

    let mut items = vec![Item::Const(ConstItem {
        doc: Some("Table name".to_string()),
        name: "TABLE_NAME".to_string(),
        ty: "&str".to_string(),
        value: format!("{:?}", descriptor.table_name),
    })];
    for field in &descriptor.fields {
        items.push(Item::Const(ConstItem {
            doc: doc_of(field),
            name: field.constant_name.clone(),
            ty: "&str".to_string(),
            value: format!("{:?}", field.column_name),
        }));
    }

    let fields = descriptor
        .fields
        .iter()
        .map(|f| {
            let mut attrs = vec![f.tags.persistence.clone()];
            attrs.extend(f.tags.default.clone());
            attrs.push(f.tags.external.clone());
            if f.has_distinct_alias() {
                attrs.push(f.tags.form.clone());
            }
            StructField {
                doc: doc_of(f),
                attrs,
                name: f.ident.clone(),
                ty: f.nullable_type().to_string(),
            }
        })
        .collect();
    items.push(Item::Struct(StructItem {
        doc: Some(format!("One row of `{}`", descriptor.table_name)),
        derives: strings(&[
            "Debug",
            "Clone",
            "Default",
            "PartialEq",
            "Record",
            "Serialize",
            "Deserialize",
        ]),
        attrs: vec![SERDE_CRATE.to_string()],
        name: model_type.clone(),
        fields,
    }));

    let functions = vec![
        Function::new("format")
            .private()
            .params(["&self", "pattern: &str", "include_empty: bool"])
            .returns("(String, Vec<SqlValue>)")
            .doc("Set columns rendered through `pattern`, with their values")
            .body(templates.render("model_format", ctx)?),
        Function::new("insert_sql")
            .param("&self")
            .returns("Result<Statement>")
            .body(templates.render("model_insert_sql", ctx)?),
        Function::new("update_sql")
            .param("&self")
            .returns("Result<Statement>")
            .doc("Update every column by primary key; unset columns are written as their default")
            .body(templates.render("model_update_sql", ctx)?),
        Function::new("update_sql_by_selective")
            .param("&self")
            .returns("Result<Statement>")
            .doc("Update only the set columns by primary key")
            .body(templates.render("model_update_sql_by_selective", ctx)?),
        Function::new("save_sql")
            .param("&self")
            .returns("Result<Statement>")
            .doc("Insert, or update on duplicate key")
            .body(templates.render("model_save_sql", ctx)?),
    ];
    items.push(Item::Impl(ImplBlock {
        target: model_type,
        functions,
    }));

    let mut uses = vec![PRELUDE.to_string()];
    uses.extend(type_crate_uses(&descriptor.fields));
    Ok(SourceFile {
        header: Vec::new(),
        uses,
        items,
    })
}

fn extend(descriptor: &ModuleDescriptor) -> SourceFile {
    let model_type = descriptor.type_name(Layer::Model);
    let model = StructField {
        doc: None,
        attrs: strings(&["column(embed)", "serde(flatten)"]),
        name: "model".to_string(),
        ty: model_type.clone(),
    };

    SourceFile {
        header: Vec::new(),
        uses: vec![
            PRELUDE.to_string(),
            format!("{}::{}", descriptor.target(Layer::Model).module_path, model_type),
        ],
        items: vec![Item::Struct(StructItem {
            doc: Some(format!(
                "`{}` plus columns produced by hand-written queries",
                model_type
            )),
            derives: strings(&[
                "Debug",
                "Clone",
                "Default",
                "PartialEq",
                "Record",
                "Serialize",
                "Deserialize",
            ]),
            attrs: vec![SERDE_CRATE.to_string()],
            name: descriptor.type_name(Layer::Extend),
            fields: vec![model],
        })],
    }
}

fn view(templates: &Templates, descriptor: &ModuleDescriptor, ctx: &LayerContext) -> Result<SourceFile> {
    let model_type = descriptor.type_name(Layer::Model);
    let extend_type = descriptor.type_name(Layer::Extend);
    let view_type = descriptor.type_name(Layer::View);
    let has_extend = descriptor.emits(Layer::Extend);

    let fields = descriptor
        .fields
        .iter()
        .map(|f| StructField {
            doc: doc_of(f),
            attrs: vec![f.tags.external.clone()],
            name: f.ident.clone(),
            ty: f.mapping.view_type().to_string(),
        })
        .collect();

    let mut functions = vec![
        Function::new("from_model")
            .param(format!("model: &{}", model_type))
            .returns("Self")
            .body(templates.render("view_from_model", ctx)?),
        Function::new("from_models")
            .param(format!("models: &[{}]", model_type))
            .returns("Vec<Self>")
            .body("models.iter().map(Self::from_model).collect()"),
    ];
    let mut uses = vec![
        PRELUDE.to_string(),
        format!("{}::{}", descriptor.target(Layer::Model).module_path, model_type),
    ];
    if has_extend {
        functions.push(
            Function::new("from_extend")
                .param(format!("extend: &{}", extend_type))
                .returns("Self")
                .body("Self::from_model(&extend.model)"),
        );
        functions.push(
            Function::new("from_extends")
                .param(format!("extends: &[{}]", extend_type))
                .returns("Vec<Self>")
                .body("extends.iter().map(Self::from_extend).collect()"),
        );
        uses.push(format!(
            "{}::{}",
            descriptor.target(Layer::Extend).module_path,
            extend_type
        ));
    }
    uses.extend(type_crate_uses(&descriptor.fields));

    Ok(SourceFile {
        header: Vec::new(),
        uses,
        items: vec![
            Item::Struct(StructItem {
                doc: Some(format!("Outward representation of `{}`", model_type)),
                derives: strings(&["Debug", "Clone", "Default", "PartialEq", "Serialize", "Deserialize"]),
                attrs: vec![SERDE_CRATE.to_string()],
                name: view_type.clone(),
                fields,
            }),
            Item::Impl(ImplBlock {
                target: view_type,
                functions,
            }),
        ],
    })
}

fn param(descriptor: &ModuleDescriptor) -> Result<SourceFile> {
    let mut fields: Vec<StructField> = Vec::with_capacity(descriptor.fields.len() + PAGE_FIELDS.len());
    for f in &descriptor.fields {
        if PAGE_FIELDS.iter().any(|(name, _)| *name == f.ident) {
            return Err(SchemaError::InvalidIdentifier(format!(
                "column '{}' of '{}' collides with a paging field",
                f.column_name, descriptor.table_name
            )));
        }
        let mut attrs = vec![f.tags.external.clone()];
        if f.has_distinct_alias() {
            attrs.push(f.tags.form.clone());
        }
        fields.push(StructField {
            doc: doc_of(f),
            attrs,
            name: f.ident.clone(),
            ty: f.nullable_type().to_string(),
        });
    }
    for (name, rename) in PAGE_FIELDS {
        let mut field = StructField::new(name, "Option<u64>");
        field.attrs.push(format!("serde(rename = {:?})", rename));
        if name == "page_num" {
            field.doc = Some("1-based; ignored when `page_start` is set".to_string());
        }
        fields.push(field);
    }

    let mut uses = vec![PRELUDE.to_string()];
    uses.extend(type_crate_uses(&descriptor.fields));
    Ok(SourceFile {
        header: Vec::new(),
        uses,
        items: vec![Item::Struct(StructItem {
            doc: Some(format!(
                "Query criteria for `{}`; set fields are matched by equality",
                descriptor.table_name
            )),
            derives: strings(&["Debug", "Clone", "Default", "PartialEq", "Serialize", "Deserialize"]),
            attrs: vec![SERDE_CRATE_DEFAULT.to_string()],
            name: descriptor.type_name(Layer::Param),
            fields,
        })],
    })
}

fn dao(templates: &Templates, descriptor: &ModuleDescriptor, ctx: &LayerContext) -> Result<SourceFile> {
    let model = descriptor.type_name(Layer::Model);
    let extend = descriptor.type_name(Layer::Extend);
    let has_extend = descriptor.emits(Layer::Extend);
    let first_key = descriptor
        .primary_key_fields
        .first()
        .ok_or_else(|| SchemaError::NoPrimaryKey(descriptor.table_name.clone()))?;
    let single_key = descriptor.single_key();
    let executor = "executor: &Executor";
    let builder = "builder: &impl StatementBuilder";
    let statement = "statement: Statement";

    let keyed = |verb: &'static str, delegate: &'static str, empty: &'static str| KeyedContext {
        layer: ctx,
        verb,
        delegate,
        empty,
    };
    let call = |name: &str, ret: String, extra: &str, body: String| -> Function {
        Function::new(name)
            .asynchronous()
            .params([executor, extra])
            .returns(ret)
            .body(body)
    };

    let mut functions = vec![Function::new("query_by_primary_key")
        .asynchronous()
        .param(executor)
        .params(key_params(descriptor))
        .returns(format!("Result<Option<{}>>", model))
        .body(templates.render(
            "dao_by_primary_key",
            &keyed("select * from", "query_first_by_sql", ""),
        )?)];
    functions.push(call(
        "query_first_by_builder",
        format!("Result<Option<{}>>", model),
        builder,
        "query_first_by_sql(executor, builder.build_select()?).await".to_string(),
    ));
    functions.push(call(
        "query_first_by_sql",
        format!("Result<Option<{}>>", model),
        statement,
        "executor.query_first(statement).await".to_string(),
    ));

    let map_type = format!("Result<HashMap<{}, {}>>", first_key.base_type(), model);
    if let Some(key) = single_key.filter(|k| k.mapping.hashable) {
        functions.push(call(
            "query_map_by_primary_keys",
            map_type.clone(),
            &format!("keys: &[{}]", key.base_type()),
            templates.render(
                "dao_by_primary_keys",
                &keyed("select * from", "query_map_by_sql", "HashMap::new()"),
            )?,
        ));
    }
    let keyed_maps = first_key.mapping.hashable;
    if keyed_maps {
        functions.push(call(
            "query_map_by_builder",
            map_type.clone(),
            builder,
            "query_map_by_sql(executor, builder.build_select()?).await".to_string(),
        ));
        functions.push(
            call(
                "query_map_by_sql",
                map_type,
                statement,
                templates.render("dao_query_map_by_sql", ctx)?,
            )
            .doc(format!("Rows keyed by `{}`; rows without it are dropped", first_key.column_name)),
        );
    }

    functions.push(call(
        "count_by_builder",
        "Result<i64>".to_string(),
        builder,
        "count_by_sql(executor, builder.build_count()?).await".to_string(),
    ));
    functions.push(call(
        "count_by_sql",
        "Result<i64>".to_string(),
        statement,
        "executor.count(statement).await".to_string(),
    ));
    functions.push(call(
        "query_by_builder",
        format!("Result<Vec<{}>>", model),
        builder,
        "query_by_sql(executor, builder.build_select()?).await".to_string(),
    ));
    functions.push(call(
        "query_by_sql",
        format!("Result<Vec<{}>>", model),
        statement,
        "executor.query(statement).await".to_string(),
    ));
    if has_extend {
        functions.push(call(
            "query_extend_by_builder",
            format!("Result<Vec<{}>>", extend),
            builder,
            "query_extend_by_sql(executor, builder.build_select()?).await".to_string(),
        ));
        functions.push(call(
            "query_extend_by_sql",
            format!("Result<Vec<{}>>", extend),
            statement,
            "executor.query(statement).await".to_string(),
        ));
    }

    let model_param = format!("model: &{}", model);
    let affected = || "Result<u64>".to_string();
    functions.push(
        call(
            "insert",
            affected(),
            &model_param,
            "insert_by_sql(executor, model.insert_sql()?).await".to_string(),
        )
        .doc("Insert the set columns; returns the generated id"),
    );
    functions.push(call(
        "insert_by_builder",
        affected(),
        builder,
        "insert_by_sql(executor, builder.build_insert()?).await".to_string(),
    ));
    functions.push(call(
        "insert_by_sql",
        affected(),
        statement,
        "executor.insert(statement).await".to_string(),
    ));
    functions.push(call(
        "update",
        affected(),
        &model_param,
        "update_by_sql(executor, model.update_sql()?).await".to_string(),
    ));
    functions.push(call(
        "update_by_selective",
        affected(),
        &model_param,
        "update_by_sql(executor, model.update_sql_by_selective()?).await".to_string(),
    ));
    functions.push(call(
        "update_by_builder",
        affected(),
        builder,
        "update_by_sql(executor, builder.build_update()?).await".to_string(),
    ));
    functions.push(call(
        "update_by_sql",
        affected(),
        statement,
        "executor.update(statement).await".to_string(),
    ));
    functions.push(
        call(
            "save",
            affected(),
            &model_param,
            "save_by_sql(executor, model.save_sql()?).await".to_string(),
        )
        .doc("Insert or update on duplicate key"),
    );
    functions.push(call(
        "save_by_sql",
        affected(),
        statement,
        "executor.save(statement).await".to_string(),
    ));

    functions.push(
        Function::new("delete_by_primary_key")
            .asynchronous()
            .param(executor)
            .params(key_params(descriptor))
            .returns(affected())
            .body(templates.render(
                "dao_by_primary_key",
                &keyed("delete from", "delete_by_sql", ""),
            )?),
    );
    if let Some(key) = single_key {
        functions.push(call(
            "delete_by_primary_keys",
            affected(),
            &format!("keys: &[{}]", key.base_type()),
            templates.render(
                "dao_by_primary_keys",
                &keyed("delete from", "delete_by_sql", "0"),
            )?,
        ));
    }
    functions.push(call(
        "delete_by_builder",
        affected(),
        builder,
        "delete_by_sql(executor, builder.build_delete()?).await".to_string(),
    ));
    functions.push(call(
        "delete_by_sql",
        affected(),
        statement,
        "executor.delete(statement).await".to_string(),
    ));

    let mut uses = vec![PRELUDE.to_string(), "daogen::StatementBuilder".to_string()];
    if keyed_maps {
        uses.push("std::collections::HashMap".to_string());
    }
    uses.push(format!(
        "{}::{{self, {}}}",
        descriptor.target(Layer::Model).module_path,
        model
    ));
    if has_extend {
        uses.push(format!("{}::{}", descriptor.target(Layer::Extend).module_path, extend));
    }
    uses.extend(type_crate_uses(&descriptor.primary_key_fields));

    Ok(SourceFile {
        header: Vec::new(),
        uses,
        items: functions.into_iter().map(Item::Function).collect(),
    })
}

fn service(templates: &Templates, descriptor: &ModuleDescriptor, ctx: &LayerContext) -> Result<SourceFile> {
    let model = descriptor.type_name(Layer::Model);
    let param = descriptor.type_name(Layer::Param);
    let dao_module = &descriptor.target(Layer::Dao).stem;

    let functions = vec![
        Function::new("query_by_primary_key")
            .asynchronous()
            .param("executor: &Executor")
            .params(key_params(descriptor))
            .returns(format!("Result<Option<{}>>", model))
            .body(format!(
                "{}::query_by_primary_key(executor, {}).await",
                dao_module,
                key_args(descriptor)
            )),
        Function::new("query_by_param")
            .asynchronous()
            .params(["executor: &Executor".to_string(), format!("param: &{}", param)])
            .returns(format!("Result<Vec<{}>>", model))
            .doc("Rows equal to every set field of `param`, paged when a page size is set")
            .body(templates.render("service_query_by_param", ctx)?),
    ];

    let mut uses = vec![
        PRELUDE.to_string(),
        descriptor.target(Layer::Dao).module_path.clone(),
        format!(
            "{}::{{self, {}}}",
            descriptor.target(Layer::Model).module_path,
            model
        ),
        format!("{}::{}", descriptor.target(Layer::Param).module_path, param),
    ];
    uses.extend(type_crate_uses(&descriptor.primary_key_fields));

    Ok(SourceFile {
        header: Vec::new(),
        uses,
        items: functions.into_iter().map(Item::Function).collect(),
    })
}

fn controller(descriptor: &ModuleDescriptor) -> SourceFile {
    SourceFile {
        header: Vec::new(),
        uses: vec!["daogen::serde_json::{json, Value}".to_string()],
        items: vec![Item::Function(
            Function::new("index")
                .doc(format!("Index handler of the `{}` module", descriptor.table_name))
                .returns("Value")
                .body("json!({\"code\": 200})"),
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ModuleRequest;
    use crate::introspect::{RawColumn, TableSchema};

    fn raw(name: &str, data_type: &str, primary_key: bool) -> RawColumn {
        RawColumn {
            name: name.to_string(),
            data_type: data_type.to_string(),
            nullable: !primary_key,
            primary_key,
            comment: String::new(),
            default: None,
        }
    }

    fn descriptor(columns: &[RawColumn], request: ModuleRequest) -> ModuleDescriptor {
        let fields: Vec<Field> = columns
            .iter()
            .map(|c| Field::from_column(&request.table, c).unwrap())
            .collect();
        let schema = TableSchema {
            table: request.table.clone(),
            primary_key_fields: fields.iter().filter(|f| f.primary_key).cloned().collect(),
            fields,
        };
        ModuleDescriptor::build(&request, "app", schema).unwrap()
    }

    fn function_names(file: &SourceFile) -> Vec<String> {
        file.items
            .iter()
            .filter_map(|item| match item {
                Item::Function(f) => Some(f.name.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_single_key_dao_has_key_list_functions() {
        let templates = Templates::new().unwrap();
        let d = descriptor(
            &[raw("id", "int", true), raw("name", "varchar", false)],
            ModuleRequest::new("user", "/srv/app/src/dal"),
        );
        let names = function_names(&build(&templates, &d, Layer::Dao).unwrap());
        for expected in [
            "query_by_primary_key",
            "query_map_by_primary_keys",
            "query_map_by_sql",
            "query_extend_by_sql",
            "insert_by_builder",
            "update_by_selective",
            "save_by_sql",
            "delete_by_primary_keys",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_composite_key_dao_omits_key_list_functions() {
        let templates = Templates::new().unwrap();
        let d = descriptor(
            &[
                raw("order_id", "bigint", true),
                raw("line", "int", true),
                raw("qty", "int", false),
            ],
            ModuleRequest::new("order_line", "/srv/app/src").with_layers([Layer::Model, Layer::Dao]),
        );
        let file = build(&templates, &d, Layer::Dao).unwrap();
        let names = function_names(&file);
        assert!(!names.iter().any(|n| n == "query_map_by_primary_keys"));
        assert!(!names.iter().any(|n| n == "delete_by_primary_keys"));
        assert!(!names.iter().any(|n| n.starts_with("query_extend")));
        assert!(names.iter().any(|n| n == "query_map_by_sql"));
        assert!(!file.uses.iter().any(|u| u.contains("OrderLineExtend")));
    }

    #[test]
    fn test_unhashable_first_key_has_no_maps() {
        let templates = Templates::new().unwrap();
        let d = descriptor(
            &[raw("score", "double", true)],
            ModuleRequest::new("rank", "/srv/app/src"),
        );
        let names = function_names(&build(&templates, &d, Layer::Dao).unwrap());
        assert!(!names.iter().any(|n| n.starts_with("query_map")));
        assert!(names.iter().any(|n| n == "delete_by_primary_keys"));
    }

    #[test]
    fn test_model_tags_and_uses() {
        let templates = Templates::new().unwrap();
        let mut created = raw("created_at", "datetime", false);
        created.default = Some("CURRENT_TIMESTAMP".to_string());
        let d = descriptor(
            &[raw("id", "int", true), created],
            ModuleRequest::new("user", "/srv/app/src"),
        );
        let file = build(&templates, &d, Layer::Model).unwrap();
        assert!(file.uses.contains(&"daogen::chrono".to_string()));

        let model = file
            .items
            .iter()
            .find_map(|item| match item {
                Item::Struct(s) => Some(s),
                _ => None,
            })
            .unwrap();
        assert_eq!(model.name, "UserModel");
        assert_eq!(model.fields[1].ty, "Option<chrono::NaiveDateTime>");
        assert_eq!(
            model.fields[1].attrs,
            vec![
                r#"column(name = "created_at")"#.to_string(),
                r#"column(default = "CURRENT_TIMESTAMP")"#.to_string(),
                r#"serde(rename = "created_at")"#.to_string(),
                r#"serde(alias = "createdAt")"#.to_string(),
            ]
        );
        assert_eq!(model.fields[0].attrs.len(), 2);
    }

    #[test]
    fn test_param_rejects_paging_collision() {
        let templates = Templates::new().unwrap();
        let d = descriptor(
            &[raw("id", "int", true), raw("page_size", "int", false)],
            ModuleRequest::new("report", "/srv/app/src"),
        );
        assert_eq!(
            build(&templates, &d, Layer::Param).unwrap_err().error_code(),
            "E_INVALID_IDENTIFIER"
        );
        assert!(build(&templates, &d, Layer::Model).is_ok());
    }
}
