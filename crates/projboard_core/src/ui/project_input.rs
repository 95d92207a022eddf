//! Project submission form.
//!
//! # Responsibility
//! - Read the title, description and people fields on submit.
//! - Validate them, add the project to the store and clear the form.
//!
//! # Invariants
//! - Submission never reloads the page (default is always prevented).
//! - On validation failure the user is alerted, fields keep their values
//!   and the store is untouched.

use super::component::{Component, ComponentBase, MountSpec};
use super::event::EventKind;
use super::surface::{ElementHandle, InsertPosition, RenderSurface, UiResult};
use crate::config::BoardConfig;
use crate::error::{BoardResult, FormField, ValidationError, ValidationReason};
use crate::model::project::ProjectId;
use crate::state::project_state::ProjectState;
use crate::validation::{check, Validatable};
use log::{error, info};
use std::rc::Rc;

pub const TEMPLATE_ID: &str = "project-input";
pub const HOST_ID: &str = "app";
pub const ELEMENT_ID: &str = "user-input";

/// Message shown when submitted input is rejected.
pub const INVALID_INPUT_ALERT: &str = "Invalid input!";

/// Team-size bounds applied on submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputRules {
    pub max_people: i64,
    pub min_people: Option<i64>,
}

impl From<&BoardConfig> for InputRules {
    fn from(config: &BoardConfig) -> Self {
        Self {
            max_people: config.max_people,
            min_people: config.min_people,
        }
    }
}

/// Validated form values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub people: i64,
}

impl InputRules {
    /// Validates raw field text.
    ///
    /// Title must be non-blank. People must be a whole number within the
    /// configured bounds; an empty people field counts as zero. Description
    /// is not constrained.
    pub fn validate(
        &self,
        title: &str,
        description: &str,
        people: &str,
    ) -> Result<ProjectDraft, ValidationError> {
        check(&Validatable::new(title).required())
            .map_err(|violation| ValidationError::rule(FormField::Title, violation))?;

        let count = parse_people(people)?;
        let mut rule = Validatable::new(count)
            .required()
            .max(self.max_people as f64);
        if let Some(min) = self.min_people {
            rule = rule.min(min as f64);
        }
        check(&rule).map_err(|violation| ValidationError::rule(FormField::People, violation))?;

        Ok(ProjectDraft {
            title: title.to_string(),
            description: description.to_string(),
            people: count,
        })
    }
}

fn parse_people(raw: &str) -> Result<i64, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    if let Ok(value) = trimmed.parse::<i64>() {
        return Ok(value);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => Ok(value as i64),
        _ => Err(ValidationError {
            field: FormField::People,
            reason: ValidationReason::NotANumber(trimmed.to_string()),
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FormFields {
    title: ElementHandle,
    description: ElementHandle,
    people: ElementHandle,
}

/// Everything the submit handler needs, captured by value.
#[derive(Clone)]
struct SubmitContext {
    surface: Rc<dyn RenderSurface>,
    state: ProjectState,
    fields: FormFields,
    rules: InputRules,
}

impl SubmitContext {
    fn submit(&self) -> BoardResult<ProjectId> {
        let title = self.surface.value(self.fields.title)?;
        let description = self.surface.value(self.fields.description)?;
        let people = self.surface.value(self.fields.people)?;

        let draft = match self.rules.validate(&title, &description, &people) {
            Ok(draft) => draft,
            Err(err) => {
                info!(
                    "event=project_submit module=input status=rejected field={}",
                    err.field.as_str()
                );
                self.surface.alert(INVALID_INPUT_ALERT);
                return Err(err.into());
            }
        };

        let id = self
            .state
            .add_project(draft.title, draft.description, draft.people);
        self.clear()?;
        Ok(id)
    }

    fn clear(&self) -> UiResult<()> {
        self.surface.set_value(self.fields.title, "")?;
        self.surface.set_value(self.fields.description, "")?;
        self.surface.set_value(self.fields.people, "")
    }
}

/// Form component mounted at the start of `#app`.
pub struct ProjectInput {
    base: ComponentBase,
    context: SubmitContext,
}

impl ProjectInput {
    pub fn new(
        surface: Rc<dyn RenderSurface>,
        state: ProjectState,
        rules: InputRules,
    ) -> UiResult<Self> {
        let base = ComponentBase::mount(
            surface.clone(),
            &MountSpec::new(TEMPLATE_ID, HOST_ID, InsertPosition::Start)
                .with_element_id(ELEMENT_ID),
        )?;
        let fields = FormFields {
            title: base.require("#title")?,
            description: base.require("#description")?,
            people: base.require("#people")?,
        };
        let mut input = Self {
            base,
            context: SubmitContext {
                surface,
                state,
                fields,
                rules,
            },
        };
        input.configure()?;
        Ok(input)
    }

    /// The form element; dispatch `submit` on it to trigger the handler.
    pub fn form(&self) -> ElementHandle {
        self.base.element()
    }

    pub fn title_field(&self) -> ElementHandle {
        self.context.fields.title
    }

    pub fn description_field(&self) -> ElementHandle {
        self.context.fields.description
    }

    pub fn people_field(&self) -> ElementHandle {
        self.context.fields.people
    }

    /// Fills all three fields and submits, like a user would.
    pub fn submit_values(
        &self,
        title: &str,
        description: &str,
        people: &str,
    ) -> BoardResult<ProjectId> {
        let surface = &self.context.surface;
        surface.set_value(self.context.fields.title, title)?;
        surface.set_value(self.context.fields.description, description)?;
        surface.set_value(self.context.fields.people, people)?;
        self.context.submit()
    }
}

impl Component for ProjectInput {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn configure(&mut self) -> UiResult<()> {
        let context = self.context.clone();
        self.base.surface().add_event_listener(
            self.base.element(),
            EventKind::Submit,
            Box::new(move |event| {
                event.prevent_default();
                if let Err(err) = context.submit() {
                    if !err.is_recoverable() {
                        error!("event=project_submit module=input status=error error={err}");
                    }
                }
            }),
        )
    }

    fn render_content(&mut self) -> UiResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_people, InputRules};
    use crate::error::{FormField, ValidationReason};
    use crate::validation::RuleViolation;

    const DEFAULT_RULES: InputRules = InputRules {
        max_people: 6,
        min_people: None,
    };

    #[test]
    fn accepts_boundary_team_size() {
        let draft = DEFAULT_RULES
            .validate("Build API", "v1", "6")
            .expect("six people should pass");
        assert_eq!(draft.people, 6);
    }

    #[test]
    fn rejects_team_size_above_max() {
        let err = DEFAULT_RULES
            .validate("Build API", "v1", "7")
            .expect_err("seven people must fail");
        assert_eq!(err.field, FormField::People);
        assert!(matches!(
            err.reason,
            ValidationReason::Rule(RuleViolation::Max { .. })
        ));
    }

    #[test]
    fn rejects_blank_title() {
        let err = DEFAULT_RULES
            .validate("   ", "v1", "3")
            .expect_err("blank title must fail");
        assert_eq!(err.field, FormField::Title);
    }

    #[test]
    fn zero_and_negative_team_sizes_pass_without_min() {
        assert_eq!(
            DEFAULT_RULES.validate("t", "", "").expect("empty is zero").people,
            0
        );
        assert_eq!(
            DEFAULT_RULES.validate("t", "", "-2").expect("negative passes").people,
            -2
        );
    }

    #[test]
    fn configured_min_rejects_zero() {
        let rules = InputRules {
            max_people: 6,
            min_people: Some(1),
        };
        let err = rules.validate("t", "", "0").expect_err("zero must fail");
        assert_eq!(err.field, FormField::People);
    }

    #[test]
    fn parse_people_accepts_integral_floats_only() {
        assert_eq!(parse_people(" 3 ").expect("integer"), 3);
        assert_eq!(parse_people("4.0").expect("integral float"), 4);
        assert!(parse_people("2.5").is_err());
        assert!(parse_people("many").is_err());
    }
}
