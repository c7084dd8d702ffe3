use serde_json::{Map, Value};

/// A decoded form submission: arbitrary field names mapped to scalar values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Submission {
    fields: Map<String, Value>,
}

impl Submission {
    /// Anything other than a JSON object becomes an empty submission.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Value of the first alias that is present, in the given order.
    ///
    /// `null` and empty strings count as absent, so an empty `firstName`
    /// does not shadow a filled-in `First name`.
    pub fn lookup<S: AsRef<str>>(&self, aliases: &[S]) -> Option<&Value> {
        aliases
            .iter()
            .filter_map(|alias| self.fields.get(alias.as_ref()))
            .find(|value| is_present(value))
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
