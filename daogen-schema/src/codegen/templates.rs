//! Function body templates
//!
//! Bodies that iterate over columns are kept as handlebars templates; the
//! rendered text is re-indented by the printer, so templates are written at
//! column zero.

use crate::{Result, SchemaError};
use handlebars::Handlebars;
use serde::Serialize;

pub const MODEL_FORMAT: &str = include_str!("templates/model_format.hbs");
pub const MODEL_INSERT_SQL: &str = include_str!("templates/model_insert_sql.hbs");
pub const MODEL_UPDATE_SQL: &str = include_str!("templates/model_update_sql.hbs");
pub const MODEL_UPDATE_SQL_BY_SELECTIVE: &str =
    include_str!("templates/model_update_sql_by_selective.hbs");
pub const MODEL_SAVE_SQL: &str = include_str!("templates/model_save_sql.hbs");
pub const VIEW_FROM_MODEL: &str = include_str!("templates/view_from_model.hbs");
pub const DAO_BY_PRIMARY_KEY: &str = include_str!("templates/dao_by_primary_key.hbs");
pub const DAO_BY_PRIMARY_KEYS: &str = include_str!("templates/dao_by_primary_keys.hbs");
pub const DAO_QUERY_MAP_BY_SQL: &str = include_str!("templates/dao_query_map_by_sql.hbs");
pub const SERVICE_QUERY_BY_PARAM: &str = include_str!("templates/service_query_by_param.hbs");

const BUILTIN: &[(&str, &str)] = &[
    ("model_format", MODEL_FORMAT),
    ("model_insert_sql", MODEL_INSERT_SQL),
    ("model_update_sql", MODEL_UPDATE_SQL),
    ("model_update_sql_by_selective", MODEL_UPDATE_SQL_BY_SELECTIVE),
    ("model_save_sql", MODEL_SAVE_SQL),
    ("view_from_model", VIEW_FROM_MODEL),
    ("dao_by_primary_key", DAO_BY_PRIMARY_KEY),
    ("dao_by_primary_keys", DAO_BY_PRIMARY_KEYS),
    ("dao_query_map_by_sql", DAO_QUERY_MAP_BY_SQL),
    ("service_query_by_param", SERVICE_QUERY_BY_PARAM),
];

/// Registry of the body templates
pub struct Templates {
    handlebars: Handlebars<'static>,
}

impl Templates {
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        // Output is Rust source, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.register_helper("sql_value", Box::new(sql_value_helper));

        for (name, source) in BUILTIN {
            handlebars
                .register_template_string(name, *source)
                .map_err(|e| SchemaError::template(format!("{}: {}", name, e)))?;
        }
        Ok(Self { handlebars })
    }

    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String> {
        self.handlebars
            .render(name, data)
            .map_err(|e| SchemaError::template(format!("{}: {}", name, e)))
    }
}

/// `{{sql_value accessor expr}}` renders `SqlValue::<accessor>(<expr>)`
fn sql_value_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> handlebars::HelperResult {
    let mut args = Vec::with_capacity(2);
    for index in 0..2 {
        let value = h
            .param(index)
            .and_then(|p| p.value().as_str())
            .ok_or_else(|| {
                handlebars::RenderError::new("sql_value helper requires two string parameters")
            })?;
        args.push(value);
    }
    out.write(&format!("SqlValue::{}({})", args[0], args[1]))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtin_templates_register() {
        assert!(Templates::new().is_ok());
    }

    #[test]
    fn test_sql_value_helper_and_no_escaping() {
        let mut templates = Templates::new().unwrap();
        templates
            .handlebars
            .register_template_string("helper_sample", "{{sql_value accessor \"v.clone()\"}} <{{name}}>")
            .unwrap();
        let out = templates
            .render("helper_sample", &json!({"accessor": "Int", "name": "a&b"}))
            .unwrap();
        assert_eq!(out, "SqlValue::Int(v.clone()) <a&b>");
    }

    #[test]
    fn test_missing_variable_is_an_error() {
        let err = Templates::new()
            .unwrap()
            .render("dao_query_map_by_sql", &json!({}))
            .unwrap_err();
        assert_eq!(err.error_code(), "E_TEMPLATE");
    }
}
