use crate::domain::model::{CanonicalCustomer, CustomerDefaults, FieldNames, RawRecord};
use crate::utils::error::RecordError;

/// Projects raw records onto the customer shape.
#[derive(Debug, Clone, Default)]
pub struct FieldMapper {
    fields: FieldNames,
    defaults: CustomerDefaults,
}

impl FieldMapper {
    pub fn new(fields: FieldNames, defaults: CustomerDefaults) -> Self {
        Self { fields, defaults }
    }

    /// Email is required; first and last name fall back to empty strings.
    pub fn map(&self, raw: &RawRecord) -> Result<CanonicalCustomer, RecordError> {
        let email = raw
            .get(&self.fields.email)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| RecordError::MissingField {
                field: self.fields.email.clone(),
            })?;

        Ok(CanonicalCustomer {
            first_name: raw.get(&self.fields.first_name).unwrap_or_default().to_string(),
            last_name: raw.get(&self.fields.last_name).unwrap_or_default().to_string(),
            email: email.to_string(),
            website_id: self.defaults.website_id,
            group_id: self.defaults.group_id,
        })
    }
}
