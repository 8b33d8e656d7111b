//! Server-rendered single page: selector, question box, submit button, answer region.
//!
//! The markup lives in `templates/page.html`; minijinja auto-escapes every value
//! because the template name ends in `.html`.

use minijinja::{context, Environment};

use crate::answer::Answer;
use crate::persona::PersonaRegistry;

pub const APP_TITLE: &str = "LLM Expert Switcher (A/B)";

const PAGE_TEMPLATE: &str = "page.html";

const QUESTION_PLACEHOLDER: &str = "e.g. Plan a customer acquisition strategy for the first month \
    of a new D2C brand (A) / We want better accuracy from our internal FAQ search. \
    Which metrics should we track? (B)";

/// Holds the compiled page template. Built once at startup.
#[derive(Clone)]
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(PAGE_TEMPLATE, include_str!("../../templates/page.html"))?;
        Ok(Self { env })
    }

    /// Renders the page. The submitted question and selection are echoed back so the
    /// form is not cleared on submit.
    pub fn render(
        &self,
        registry: &PersonaRegistry,
        question: &str,
        expert: &str,
        answer: Option<&Answer>,
    ) -> Result<String, minijinja::Error> {
        let selected = registry.normalize(expert);

        self.env.get_template(PAGE_TEMPLATE)?.render(context! {
            title => APP_TITLE,
            personas => registry.personas(),
            selected => selected.code(),
            placeholder => QUESTION_PLACEHOLDER,
            question => question,
            answer => answer.map(|a| a.to_string()),
        })
    }
}
