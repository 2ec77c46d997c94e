//! Prompt templates for the summarizer and sentiment roles
//!
//! System prompts are fixed strings; user messages are minijinja templates
//! compiled once into a [`PromptCatalog`]. Corrective feedback accumulated
//! across attempts renders as a "Corrections from previous attempt" block
//! so a retried model call sees what the guardrails rejected.

use crate::error::Result;
use brief_core::{AgentRole, AgentTask};
use minijinja::Environment;
use serde_json::json;

/// Post content is clipped to this many characters in sentiment prompts
const POST_CLIP_CHARS: usize = 400;

/// Canned summarizer output for an empty filing set
pub const NO_FILINGS_OUTPUT: &str = "No insider filings to summarize.";

const SUMMARIZER_SYSTEM: &str = r#"You are a financial filings analyst writing a terse daily brief.

Summarize the insider transaction filings you are given into 4-6 concise bullet points. Focus on:
- Notable buys and sells by officers and directors
- Companies appearing in more than one filing
- Anything unusual worth watching

Plain Markdown bullets only. Never give investment advice and never promise outcomes.
"#;

const SENTIMENT_SYSTEM: &str = r#"You are a social sentiment analyst scoring a creator's recent posts.

For each post, assign a label (positive, negative, or neutral) and a one or two word theme. Then write a three-sentence overall read of the creator's current stance.

Respond with a single JSON object and no surrounding prose:
{"creator": "...", "posts": [{"content": "...", "label": "...", "theme": "..."}], "overall": "..."}
"#;

const SUMMARIZER_USER: &str = r#"Insider transaction filings in the current window:
{% for record in records %}
- [{{ record.timestamp }}] {{ record.text }}
{% endfor %}
Write the brief now.
{% if feedback %}
Corrections from previous attempt:
{% for item in feedback %}
- {{ item }}
{% endfor %}
{% endif %}"#;

const SENTIMENT_USER: &str = r#"Creator: {{ creator }}
{% if summary %}
Market context from today's filings brief:
{{ summary }}
{% endif %}
Recent posts:
{% for post in posts %}
- [{{ post.timestamp }}] {{ post.text | clip(clip_chars) }}
{% endfor %}
Score the posts and produce the JSON object now.
{% if feedback %}
Corrections from previous attempt:
{% for item in feedback %}
- {{ item }}
{% endfor %}
{% endif %}"#;

/// Canned sentiment output for a creator with no posts in the window
///
/// Shaped to satisfy the default sentiment guardrails, so an empty record
/// set still flows through validation like any other output.
pub fn no_activity_sentiment(creator: &str) -> String {
    json!({
        "creator": creator,
        "posts": [],
        "overall": "No recent posts to assess for this creator.",
    })
    .to_string()
}

/// Compiled prompt templates, built once per pipeline
pub struct PromptCatalog {
    env: Environment<'static>,
}

impl PromptCatalog {
    /// Compile all templates
    ///
    /// # Errors
    ///
    /// Returns a template error if any template fails to parse, so a broken
    /// template is caught at pipeline construction rather than mid-run.
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_filter("clip", |s: String, limit: usize| -> String {
            s.chars().take(limit).collect()
        });
        env.add_template("summarizer_user", SUMMARIZER_USER)?;
        env.add_template("sentiment_user", SENTIMENT_USER)?;
        Ok(Self { env })
    }

    /// System prompt for a role
    pub fn system_prompt(&self, role: AgentRole) -> &'static str {
        match role {
            AgentRole::Summarizer => SUMMARIZER_SYSTEM,
            AgentRole::Sentiment => SENTIMENT_SYSTEM,
        }
    }

    /// Render the user message for a task, feedback included
    pub fn user_prompt(&self, task: &AgentTask) -> Result<String> {
        match task.role {
            AgentRole::Summarizer => self.summarizer_user(task),
            AgentRole::Sentiment => self.sentiment_user(task),
        }
    }

    fn summarizer_user(&self, task: &AgentTask) -> Result<String> {
        let rendered = self.env.get_template("summarizer_user")?.render(json!({
            "records": task.records.as_ref(),
            "feedback": task.context.feedback(),
        }))?;
        Ok(rendered)
    }

    fn sentiment_user(&self, task: &AgentTask) -> Result<String> {
        let rendered = self.env.get_template("sentiment_user")?.render(json!({
            "creator": task.creator().unwrap_or("unknown"),
            "summary": task.context.summary(),
            "posts": task.records.as_ref(),
            "feedback": task.context.feedback(),
            "clip_chars": POST_CLIP_CHARS,
        }))?;
        Ok(rendered)
    }
}
