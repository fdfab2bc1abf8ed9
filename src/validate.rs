use axum::{Json, extract::{FromRequest, Request}};
use serde_json::{Map, Value};

use crate::{AppError, Issue};

/// Request bodies that check themselves and report every problem at once.
pub trait Validate: Sized {
    fn validate(body: &Value) -> Result<Self, Vec<Issue>>;
}

/// JSON body extractor that rejects with 400 and a list of issues.
#[derive(Debug, Clone)]
pub struct Valid<T>(pub T);

impl<S, T> FromRequest<S> for Valid<T>
where
    S: Send + Sync,
    T: Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Invalid(vec![Issue::invalid_body(rejection.body_text())]))?;

        T::validate(&body).map(Valid).map_err(AppError::Invalid)
    }
}

/// Field-by-field reader over a JSON object that collects issues as it goes.
pub struct Fields<'a> {
    body: &'a Map<String, Value>,
    issues: Vec<Issue>,
}

impl<'a> Fields<'a> {
    pub fn new(body: &'a Value) -> Result<Self, Vec<Issue>> {
        match body.as_object() {
            Some(body) => Ok(Fields { body, issues: Vec::new() }),
            None => Err(vec![Issue::invalid_body("Expected a JSON object")]),
        }
    }

    // null and absent are the same thing here
    fn get(&self, field: &str) -> Option<&'a Value> {
        self.body.get(field).filter(|value| !value.is_null())
    }

    pub fn required_str(&mut self, field: &str, empty_message: &str) -> String {
        match self.get(field) {
            None => {
                self.issues.push(Issue::new("invalid_type", field, "Required"));
                String::new()
            }
            Some(Value::String(value)) if value.is_empty() => {
                self.issues.push(Issue::new("too_small", field, empty_message));
                String::new()
            }
            Some(Value::String(value)) => value.clone(),
            Some(_) => {
                self.issues.push(Issue::new("invalid_type", field, "Expected string"));
                String::new()
            }
        }
    }

    pub fn optional_str(&mut self, field: &str) -> Option<String> {
        match self.get(field)? {
            Value::String(value) => Some(value.clone()),
            _ => {
                self.issues.push(Issue::new("invalid_type", field, "Expected string"));
                None
            }
        }
    }

    pub fn required_int(&mut self, field: &str) -> Option<i64> {
        match self.get(field) {
            None => {
                self.issues.push(Issue::new("invalid_type", field, "Required"));
                None
            }
            Some(value) => self.int(field, value),
        }
    }

    pub fn optional_int(&mut self, field: &str) -> Option<i64> {
        let value = self.get(field)?;
        self.int(field, value)
    }

    pub fn check(&mut self, ok: bool, code: &'static str, field: &str, message: &str) {
        if !ok {
            self.issues.push(Issue::new(code, field, message));
        }
    }

    pub fn finish(self) -> Result<(), Vec<Issue>> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(self.issues)
        }
    }

    fn int(&mut self, field: &str, value: &Value) -> Option<i64> {
        let Some(number) = value.as_f64() else {
            self.issues.push(Issue::new("invalid_type", field, "Expected number"));
            return None;
        };
        if let Some(int) = value.as_i64() {
            return Some(int);
        }
        if number.fract() == 0.0 && number.abs() < i64::MAX as f64 {
            return Some(number as i64);
        }
        self.issues.push(Issue::new("invalid_type", field, "Expected integer"));
        None
    }
}
