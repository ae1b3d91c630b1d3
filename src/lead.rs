//! Lead-capture form: validation, the multi-step wizard, and submission.
//!
//! ## Fields
//!
//! | Field | Rule (after trimming) |
//! |-------|-----------------------|
//! | `name` | at least 2 characters |
//! | `email` | a valid address |
//! | `phone` | at least 10 characters |
//! | `businessType` | not empty |
//! | `marketingChallenge` | at least 10 characters |
//!
//! ## Wizard
//!
//! ```text
//! Contact (name, email, phone) → Business (type, challenge) → Review
//! ```
//!
//! Advancing validates only the fields of the current step. Going back never
//! validates.
//!
//! ## Submission
//!
//! A valid form is sent once as a JSON `POST` to the configured endpoint.
//! Any status outside 200–299, or any transport failure, ends in
//! [`FormState::Failed`]. Nothing is retried automatically.
//!
//! ```text
//! Editing ──submit──▶ Submitting ──2xx──▶ Succeeded
//!    ▲                    │
//!    │ (invalid)          └──error──▶ Failed ──submit──▶ Submitting
//!    └────────────────────
//! ```

use crate::config::FormsConfig;
use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Message shown to the visitor when a submission fails, whatever the cause.
pub const FAILURE_MESSAGE: &str =
    "Something went wrong sending your request. Please try again or call us directly.";

/// Email rule. Also rendered into the page for the browser-side wizard, so
/// it must stay valid JavaScript regex syntax.
pub const EMAIL_PATTERN: &str = r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$";

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid email regex"));

// =============================================================================
// Fields and validation
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Phone,
    BusinessType,
    MarketingChallenge,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Email,
        Field::Phone,
        Field::BusinessType,
        Field::MarketingChallenge,
    ];

    /// Key used in the JSON body and as the HTML input name.
    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::BusinessType => "businessType",
            Field::MarketingChallenge => "marketingChallenge",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Your name",
            Field::Email => "Email",
            Field::Phone => "Phone",
            Field::BusinessType => "Type of business",
            Field::MarketingChallenge => "Your biggest marketing challenge",
        }
    }

    /// Minimum length in characters, for fields that have one.
    pub fn min_chars(self) -> Option<usize> {
        match self {
            Field::Name => Some(2),
            Field::Phone | Field::MarketingChallenge => Some(10),
            Field::BusinessType => Some(1),
            Field::Email => None,
        }
    }

    /// Message shown next to the field when its rule fails.
    pub fn message(self) -> &'static str {
        match self {
            Field::Name => "Name must be at least 2 characters",
            Field::Email => "Please enter a valid email address",
            Field::Phone => "Phone number must be at least 10 characters",
            Field::BusinessType => "Please select your type of business",
            Field::MarketingChallenge => {
                "Please describe your challenge in at least 10 characters"
            }
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One failed field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

/// Every field that failed validation, in field order.
#[derive(Error, Debug, Clone, PartialEq, Eq, Default)]
#[error("invalid fields: {}", .0.iter().map(|e| e.field.key()).collect::<Vec<_>>().join(", "))]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Error message for one field, if it failed.
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.iter().map(|e| e.field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

/// Raw form input as typed by the visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LeadForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub business_type: String,
    pub marketing_challenge: String,
}

impl LeadForm {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::BusinessType => &self.business_type,
            Field::MarketingChallenge => &self.marketing_challenge,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::BusinessType => &mut self.business_type,
            Field::MarketingChallenge => &mut self.marketing_challenge,
        };
        *slot = value.into();
    }

    /// Check one field. Returns `None` when it passes.
    pub fn check(&self, field: Field) -> Option<FieldError> {
        let value = self.value(field).trim();
        let ok = match field {
            Field::Email => EMAIL.is_match(value),
            _ => value.chars().count() >= field.min_chars().unwrap_or(0),
        };
        (!ok).then_some(FieldError {
            field,
            message: field.message(),
        })
    }

    /// Check a subset of fields.
    pub fn check_fields(&self, fields: &[Field]) -> Result<(), ValidationErrors> {
        let errors: Vec<FieldError> = fields.iter().filter_map(|f| self.check(*f)).collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }

    /// Validate every field, producing a lead that can be submitted.
    pub fn validate(&self) -> Result<ValidLead, ValidationErrors> {
        self.check_fields(&Field::ALL)?;
        Ok(ValidLead {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            business_type: self.business_type.trim().to_string(),
            marketing_challenge: self.marketing_challenge.trim().to_string(),
        })
    }
}

/// A form that passed validation, with values trimmed.
///
/// Only [`LeadForm::validate`] constructs one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidLead {
    name: String,
    email: String,
    phone: String,
    business_type: String,
    marketing_challenge: String,
}

impl ValidLead {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

// =============================================================================
// Wizard
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Contact,
    Business,
    Review,
}

impl Step {
    pub fn fields(self) -> &'static [Field] {
        match self {
            Step::Contact => &[Field::Name, Field::Email, Field::Phone],
            Step::Business => &[Field::BusinessType, Field::MarketingChallenge],
            Step::Review => &[],
        }
    }

    pub fn next(self) -> Option<Step> {
        match self {
            Step::Contact => Some(Step::Business),
            Step::Business => Some(Step::Review),
            Step::Review => None,
        }
    }

    pub fn previous(self) -> Option<Step> {
        match self {
            Step::Contact => None,
            Step::Business => Some(Step::Contact),
            Step::Review => Some(Step::Business),
        }
    }

    /// 1-based position, for "Step 2 of 3" labels.
    pub fn number(self) -> usize {
        match self {
            Step::Contact => 1,
            Step::Business => 2,
            Step::Review => 3,
        }
    }

    pub const COUNT: usize = 3;
}

/// Three-step lead form.
#[derive(Debug, Clone)]
pub struct LeadWizard {
    form: LeadForm,
    step: Step,
    errors: ValidationErrors,
}

impl Default for LeadWizard {
    fn default() -> Self {
        Self::new(LeadForm::default())
    }
}

impl LeadWizard {
    pub fn new(form: LeadForm) -> Self {
        Self {
            form,
            step: Step::Contact,
            errors: ValidationErrors::default(),
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn form(&self) -> &LeadForm {
        &self.form
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.form.set(field, value);
    }

    /// Errors from the last advance or submit attempt.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Validate the current step and move forward. Stays put on error.
    pub fn advance(&mut self) -> Result<Step, ValidationErrors> {
        if let Err(errors) = self.form.check_fields(self.step.fields()) {
            self.errors = errors.clone();
            return Err(errors);
        }
        self.errors = ValidationErrors::default();
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    /// Move back one step without validating.
    pub fn back(&mut self) -> Step {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.errors = ValidationErrors::default();
        self.step
    }

    /// Validate the whole form. Any failure moves the wizard to the first
    /// step holding an invalid field.
    pub fn finish(&mut self) -> Result<ValidLead, ValidationErrors> {
        match self.form.validate() {
            Ok(lead) => {
                self.errors = ValidationErrors::default();
                Ok(lead)
            }
            Err(errors) => {
                let first_bad = [Step::Contact, Step::Business]
                    .into_iter()
                    .find(|s| s.fields().iter().any(|f| errors.get(*f).is_some()));
                if let Some(step) = first_bad {
                    self.step = step;
                }
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }
}

// =============================================================================
// Submission
// =============================================================================

/// Page context sent along with the fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionMeta {
    pub source: String,
    pub page: String,
    pub city: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl SubmissionMeta {
    /// Metadata stamped with the current time.
    pub fn new(source: impl Into<String>, page: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            page: page.into(),
            city: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_city(mut self, city: Option<String>) -> Self {
        self.city = city.filter(|c| !c.trim().is_empty());
        self
    }
}

/// JSON body of a lead POST.
#[derive(Debug, Clone, Serialize)]
pub struct LeadSubmission {
    #[serde(flatten)]
    lead: ValidLead,
    source: String,
    page: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<String>,
    timestamp: String,
}

impl LeadSubmission {
    pub fn new(lead: ValidLead, meta: SubmissionMeta) -> Self {
        Self {
            lead,
            source: meta.source,
            page: meta.page,
            city: meta.city,
            timestamp: meta.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn lead(&self) -> &ValidLead {
        &self.lead
    }
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("form endpoint returned {status}")]
    Status { status: u16, body: String },
}

/// Posts leads to a form endpoint.
pub struct LeadClient {
    endpoint: String,
    client: reqwest::Client,
}

impl LeadClient {
    /// Client for the configured endpoint and timeout.
    pub fn new(forms: &FormsConfig) -> Result<Self, SubmitError> {
        Self::with_endpoint(&forms.endpoint, Duration::from_secs(forms.timeout_secs))
    }

    pub fn with_endpoint(endpoint: &str, timeout: Duration) -> Result<Self, SubmitError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one submission. Only a 2xx status counts as success; the
    /// response body is never consulted.
    pub async fn submit(&self, submission: &LeadSubmission) -> Result<(), SubmitError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("accept", "application/json")
            .json(submission)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SubmitError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// Lifecycle of one form on a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormState {
    #[default]
    Editing,
    Submitting,
    Succeeded,
    Failed { message: String },
}

/// A wizard plus the submission state around it.
#[derive(Debug, Default)]
pub struct LeadFormSession {
    pub wizard: LeadWizard,
    state: FormState,
}

impl LeadFormSession {
    pub fn new(form: LeadForm) -> Self {
        Self {
            wizard: LeadWizard::new(form),
            state: FormState::Editing,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Validate and send the form.
    ///
    /// An invalid form stays in `Editing` with errors on the wizard and no
    /// request is made. A form that already succeeded is not sent again.
    pub async fn submit(&mut self, client: &LeadClient, meta: SubmissionMeta) -> &FormState {
        if matches!(self.state, FormState::Submitting | FormState::Succeeded) {
            return &self.state;
        }
        let lead = match self.wizard.finish() {
            Ok(lead) => lead,
            Err(errors) => {
                info!(%errors, "lead form blocked by validation");
                self.state = FormState::Editing;
                return &self.state;
            }
        };

        self.state = FormState::Submitting;
        let submission = LeadSubmission::new(lead, meta);
        self.state = match client.submit(&submission).await {
            Ok(()) => {
                info!(page = %submission.page, "lead submitted");
                FormState::Succeeded
            }
            Err(e) => {
                warn!(error = %e, endpoint = client.endpoint(), "lead submission failed");
                FormState::Failed {
                    message: FAILURE_MESSAGE.to_string(),
                }
            }
        };
        &self.state
    }
}
