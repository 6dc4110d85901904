//! Request extractors that reject with `AppError`.

mod json_or_form;
mod validated_json;
mod validated_query;

pub use json_or_form::ValidatedJsonOrForm;
pub use validated_json::ValidatedJson;
pub use validated_query::ValidatedQuery;

use validator::ValidationErrors;

/// First field message, falling back to the field name.
fn first_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .find_map(|(field, errors)| {
            errors.first().map(|error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .unwrap_or_else(|| "Validation failed".to_string())
}
