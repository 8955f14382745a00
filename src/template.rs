//! Post-creation prompt template.
//!
//! The template text lives in `templates/post_creation.hbs` and is embedded
//! at compile time. It expects:
//!
//! - `agentName`, `twitterUserName`, `adjective`, `topic`
//! - `providers`: the composed provider state. When
//!   `providers.CUSTOM_TRENDS.trends` is a non-empty list a
//!   "Today's key trends" section is rendered with one bullet per item.
//!
//! Two helpers are registered: a bare `{{providers}}` renders the text form
//! of every provider block (see [`providers_text`]) and `{{json value}}`
//! renders strings as-is and anything else as compact JSON.
//!
//! Rendering here uses the same Handlebars semantics as the host so the
//! template can be previewed and tested outside it.

use handlebars::{
    no_escape, Context, Handlebars, Helper, HelperResult, Output, RenderContext,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::AgentConfig;

/// Raw template text
pub const POST_CREATION_TEMPLATE: &str = include_str!("../templates/post_creation.hbs");

const TEMPLATE_NAME: &str = "post_creation";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template failed to compile: {0}")]
    Compile(#[from] Box<handlebars::TemplateError>),

    #[error("template failed to render: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("state must be a JSON object, got {0}")]
    State(&'static str),

    #[error("failed to build template context: {0}")]
    Context(#[from] serde_json::Error),
}

/// Placeholder values for the post-creation template
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateVars {
    pub agent_name: String,
    pub twitter_user_name: String,
    pub adjective: String,
    pub topic: String,
}

impl From<&AgentConfig> for TemplateVars {
    fn from(agent: &AgentConfig) -> Self {
        Self {
            agent_name: agent.name.clone().unwrap_or_default(),
            twitter_user_name: agent.twitter_user_name.clone().unwrap_or_default(),
            adjective: agent.adjective.clone().unwrap_or_default(),
            topic: agent.topic.clone().unwrap_or_default(),
        }
    }
}

/// Plain-text form of a single value: strings unquoted, the rest as JSON
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Text form of the composed providers, one block per provider.
///
/// Each block contributes its `text` field: a string verbatim, a list as
/// its items joined with ", ". Empty blocks are skipped.
pub fn providers_text(state: &Value) -> String {
    let Some(Value::Object(providers)) = state.get("providers") else {
        return String::new();
    };

    providers
        .values()
        .filter_map(|block| match block.get("text")? {
            Value::String(s) => Some(s.clone()),
            Value::Array(items) => Some(
                items
                    .iter()
                    .map(value_text)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            Value::Null => None,
            other => Some(value_text(other)),
        })
        .filter(|text| !text.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn providers_helper(
    _: &Helper,
    _: &Handlebars,
    ctx: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    out.write(&providers_text(ctx.data()))?;
    Ok(())
}

fn json_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    if let Some(param) = h.param(0) {
        out.write(&value_text(param.value()))?;
    }
    Ok(())
}

/// Compiled post-creation template
pub struct PostTemplate {
    registry: Handlebars<'static>,
}

impl PostTemplate {
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        // Prompts are plain text
        registry.register_escape_fn(no_escape);
        registry.register_helper("providers", Box::new(providers_helper));
        registry.register_helper("json", Box::new(json_helper));
        registry
            .register_template_string(TEMPLATE_NAME, POST_CREATION_TEMPLATE)
            .map_err(Box::new)?;

        Ok(Self { registry })
    }

    /// Render with the given variables on top of a composed state object
    pub fn render(&self, vars: &TemplateVars, state: &Value) -> Result<String, TemplateError> {
        let mut context = match state {
            Value::Object(map) => map.clone(),
            Value::Array(_) => return Err(TemplateError::State("array")),
            _ => return Err(TemplateError::State("scalar")),
        };

        if let Value::Object(vars) = serde_json::to_value(vars)? {
            context.extend(vars);
        }

        Ok(self.registry.render(TEMPLATE_NAME, &Value::Object(context))?)
    }
}

/// Compile and render the post-creation template in one go
pub fn render_post_prompt(vars: &TemplateVars, state: &Value) -> Result<String, TemplateError> {
    PostTemplate::new()?.render(vars, state)
}
