//! Guided employee intake.
//!
//! A session walks a fixed sequence of steps. Each step is described by one
//! row of [`INTAKE_STEPS`]: the input it accepts, how that input is validated,
//! which field it fills and which step follows. The record is written only
//! after the last step, and the session is removed whatever the outcome of
//! that write.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use teloxide::types::UserId;

use crate::bot::conversation::ConversationStore;
use crate::database::connection::DatabaseManager;
use crate::database::models::{Employee, NewEmployee};
use crate::error::{BotError, Result};
use crate::utils::logging::{log_validation_error, log_workflow_step};
use crate::utils::validation::{validate_birth_date, validate_person_name, validate_position_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormType {
    EmployeeIntake,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    FirstName,
    LastName,
    BirthDate,
    Position,
    Photo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    FirstName,
    LastName,
    BirthDate,
    Position,
    Photo,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::FirstName => "first name",
            Field::LastName => "last name",
            Field::BirthDate => "birth date",
            Field::Position => "position",
            Field::Photo => "photo",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Photo,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::Text => f.write_str("a text message"),
            InputKind::Photo => f.write_str("a photo"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Date(NaiveDate),
    Photo(String),
}

/// One admin's in-progress form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeSession {
    pub user_id: u64,
    pub form: FormType,
    pub step: Step,
    pub fields: BTreeMap<Field, FieldValue>,
}

impl IntakeSession {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id: user_id.0,
            form: FormType::EmployeeIntake,
            step: INTAKE_STEPS[0].step,
            fields: BTreeMap::new(),
        }
    }

    fn text(&self, field: Field) -> Result<String> {
        match self.fields.get(&field) {
            Some(FieldValue::Text(value)) => Ok(value.clone()),
            _ => Err(BotError::IncompleteForm(field)),
        }
    }

    fn photo(&self, field: Field) -> Result<String> {
        match self.fields.get(&field) {
            Some(FieldValue::Photo(value)) => Ok(value.clone()),
            _ => Err(BotError::IncompleteForm(field)),
        }
    }

    fn date(&self, field: Field) -> Result<NaiveDate> {
        match self.fields.get(&field) {
            Some(FieldValue::Date(value)) => Ok(*value),
            _ => Err(BotError::IncompleteForm(field)),
        }
    }

    fn to_new_employee(&self) -> Result<NewEmployee> {
        Ok(NewEmployee {
            first_name: self.text(Field::FirstName)?,
            last_name: self.text(Field::LastName)?,
            birth_date: self.date(Field::BirthDate)?,
            position_name: self.text(Field::Position)?,
            photo_reference: Some(self.photo(Field::Photo)?),
        })
    }
}

/// Input delivered by the admin for the current step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Text(String),
    Photo(String),
}

impl Input {
    fn kind(&self) -> InputKind {
        match self {
            Input::Text(_) => InputKind::Text,
            Input::Photo(_) => InputKind::Photo,
        }
    }
}

type Validator = fn(&str) -> std::result::Result<FieldValue, String>;

pub struct StepRule {
    pub step: Step,
    pub input: InputKind,
    pub field: Field,
    pub next: Option<Step>,
    pub prompt: &'static str,
    validate: Validator,
}

pub static INTAKE_STEPS: [StepRule; 5] = [
    StepRule {
        step: Step::FirstName,
        input: InputKind::Text,
        field: Field::FirstName,
        next: Some(Step::LastName),
        prompt: "Enter the employee's first name:",
        validate: person_name,
    },
    StepRule {
        step: Step::LastName,
        input: InputKind::Text,
        field: Field::LastName,
        next: Some(Step::BirthDate),
        prompt: "Enter the employee's last name:",
        validate: person_name,
    },
    StepRule {
        step: Step::BirthDate,
        input: InputKind::Text,
        field: Field::BirthDate,
        next: Some(Step::Position),
        prompt: "Enter the employee's birth date (YYYY-MM-DD):",
        validate: birth_date,
    },
    StepRule {
        step: Step::Position,
        input: InputKind::Text,
        field: Field::Position,
        next: Some(Step::Photo),
        prompt: "Enter the employee's position:",
        validate: position_name,
    },
    StepRule {
        step: Step::Photo,
        input: InputKind::Photo,
        field: Field::Photo,
        next: None,
        prompt: "Send the employee's photo:",
        validate: photo,
    },
];

pub fn rule_for(step: Step) -> &'static StepRule {
    // Every Step variant has exactly one row, in declaration order
    &INTAKE_STEPS[step as usize]
}

fn person_name(input: &str) -> std::result::Result<FieldValue, String> {
    validate_person_name(input)
        .map(FieldValue::Text)
        .map_err(|e| e.to_string())
}

fn birth_date(input: &str) -> std::result::Result<FieldValue, String> {
    validate_birth_date(input)
        .map(FieldValue::Date)
        .map_err(|e| e.to_string())
}

fn position_name(input: &str) -> std::result::Result<FieldValue, String> {
    validate_position_name(input)
        .map(FieldValue::Text)
        .map_err(|e| e.to_string())
}

fn photo(input: &str) -> std::result::Result<FieldValue, String> {
    Ok(FieldValue::Photo(input.to_string()))
}

/// What happened after an accepted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    Next { step: Step, prompt: &'static str },
    Completed(Employee),
}

#[derive(Clone)]
pub struct IntakeWorkflow {
    db: DatabaseManager,
    sessions: ConversationStore,
}

impl IntakeWorkflow {
    pub fn new(db: DatabaseManager, sessions: ConversationStore) -> Self {
        Self { db, sessions }
    }

    /// Opens a fresh session, replacing any session the user already had.
    /// Returns the prompt for the first step.
    pub async fn start(&self, user_id: UserId) -> Result<&'static str> {
        let session = IntakeSession::new(user_id);
        let prompt = rule_for(session.step).prompt;
        self.sessions.put(user_id, session).await?;
        Ok(prompt)
    }

    pub async fn submit_text(&self, user_id: UserId, text: &str) -> Result<Progress> {
        self.submit(user_id, Input::Text(text.to_string())).await
    }

    pub async fn submit_photo(&self, user_id: UserId, photo_reference: &str) -> Result<Progress> {
        self.submit(user_id, Input::Photo(photo_reference.to_string())).await
    }

    pub async fn cancel(&self, user_id: UserId) -> Result<bool> {
        self.sessions.delete(user_id).await
    }

    pub async fn current_step(&self, user_id: UserId) -> Result<Option<Step>> {
        Ok(self.sessions.get(user_id).await?.map(|s| s.step))
    }

    async fn submit(&self, user_id: UserId, input: Input) -> Result<Progress> {
        let mut session = self
            .sessions
            .get(user_id)
            .await?
            .ok_or(BotError::NoActiveSession)?;

        let rule = rule_for(session.step);
        if rule.input != input.kind() {
            return Err(BotError::UnexpectedInputType { expected: rule.input });
        }

        let raw = match &input {
            Input::Text(text) | Input::Photo(text) => text.as_str(),
        };
        let value = (rule.validate)(raw).map_err(|message| {
            log_validation_error(&rule.field.to_string(), raw, &message, user_id.0);
            BotError::Validation(message)
        })?;

        session.fields.insert(rule.field, value);
        log_workflow_step(
            user_id.0,
            &rule.field.to_string(),
            rule.next.map(|s| rule_for(s).field.to_string()).as_deref(),
        );

        match rule.next {
            Some(next) => {
                session.step = next;
                self.sessions.put(user_id, session).await?;
                Ok(Progress::Next {
                    step: next,
                    prompt: rule_for(next).prompt,
                })
            }
            None => self.commit(user_id, &session).await.map(Progress::Completed),
        }
    }

    async fn commit(&self, user_id: UserId, session: &IntakeSession) -> Result<Employee> {
        let outcome = match session.to_new_employee() {
            Ok(new) => Employee::insert(&self.db.pool, &new).await,
            Err(e) => Err(e),
        };

        // The session ends here whether or not the insert succeeded. A failed
        // delete must not mask a row that was already written.
        if let Err(e) = self.sessions.delete(user_id).await {
            tracing::error!("Failed to close intake session for user {}: {}", user_id.0, e);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_table_is_ordered_and_linear() {
        for (i, rule) in INTAKE_STEPS.iter().enumerate() {
            assert_eq!(rule.step as usize, i);
            assert_eq!(rule_for(rule.step).step, rule.step);
        }
        let order: Vec<Step> = INTAKE_STEPS.iter().map(|r| r.step).collect();
        let nexts: Vec<Step> = INTAKE_STEPS.iter().filter_map(|r| r.next).collect();
        assert_eq!(&order[1..], nexts.as_slice());
        assert_eq!(INTAKE_STEPS[4].next, None);
    }

    #[test]
    fn test_only_photo_step_expects_photo() {
        for rule in &INTAKE_STEPS {
            let expected = if rule.step == Step::Photo { InputKind::Photo } else { InputKind::Text };
            assert_eq!(rule.input, expected);
        }
    }

    #[test]
    fn test_birth_date_validator() {
        assert_eq!(
            birth_date("1990-07-04"),
            Ok(FieldValue::Date(NaiveDate::from_ymd_opt(1990, 7, 4).unwrap()))
        );
        let message = birth_date("04/07/1990").unwrap_err();
        assert!(message.contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_new_session_starts_at_first_name() {
        let session = IntakeSession::new(UserId(5));
        assert_eq!(session.step, Step::FirstName);
        assert_eq!(session.form, FormType::EmployeeIntake);
        assert!(session.fields.is_empty());
    }

    #[test]
    fn test_incomplete_session_reports_missing_field() {
        let mut session = IntakeSession::new(UserId(5));
        session.fields.insert(Field::FirstName, FieldValue::Text("Anna".to_string()));
        match session.to_new_employee() {
            Err(BotError::IncompleteForm(field)) => assert_eq!(field, Field::LastName),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_fields_only_accept_their_own_kind() {
        let mut session = IntakeSession::new(UserId(5));
        session.fields.insert(Field::FirstName, FieldValue::Photo("p1".to_string()));
        session.fields.insert(Field::LastName, FieldValue::Text("Lee".to_string()));
        session.fields.insert(
            Field::BirthDate,
            FieldValue::Date(NaiveDate::from_ymd_opt(1990, 7, 4).unwrap()),
        );
        session.fields.insert(Field::Position, FieldValue::Text("Engineer".to_string()));
        session.fields.insert(Field::Photo, FieldValue::Text("p1".to_string()));

        assert!(matches!(
            session.to_new_employee(),
            Err(BotError::IncompleteForm(Field::FirstName))
        ));

        session.fields.insert(Field::FirstName, FieldValue::Text("Anna".to_string()));
        assert!(matches!(
            session.to_new_employee(),
            Err(BotError::IncompleteForm(Field::Photo))
        ));

        session.fields.insert(Field::Photo, FieldValue::Photo("p1".to_string()));
        let employee = session.to_new_employee().unwrap();
        assert_eq!(employee.photo_reference.as_deref(), Some("p1"));
    }

    #[test]
    fn test_session_survives_json() {
        let mut session = IntakeSession::new(UserId(9));
        session.step = Step::Position;
        session.fields.insert(Field::FirstName, FieldValue::Text("Anna".to_string()));
        session.fields.insert(
            Field::BirthDate,
            FieldValue::Date(NaiveDate::from_ymd_opt(1990, 7, 4).unwrap()),
        );

        let json = serde_json::to_string(&session).unwrap();
        let back: IntakeSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }
}
