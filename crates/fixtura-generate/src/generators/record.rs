use fixtura_core::{Record, Value};

use crate::context::GenerateContext;
use crate::errors::GenerationError;

/// Regenerate every non-null entry of the record handed to the request,
/// each by the runtime type of its current value. Nested records are
/// regenerated in place; without a record to work from, an empty record is
/// produced.
pub(crate) fn generate(ctx: &mut GenerateContext<'_>) -> Result<Value, GenerationError> {
    let Some(Value::Record(mut record)) = ctx.take_instance() else {
        return Ok(Value::Record(Record::new()));
    };

    let owner = ctx.generate_type().clone();
    let entries: Vec<(String, Value)> = record
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect();

    for (name, value) in entries {
        let Some(ty) = value.runtime_type() else {
            continue;
        };
        let nested = matches!(value, Value::Record(_)).then_some(value);
        let generated =
            ctx.generate_request(Some(owner.clone()), ty, Some(name.clone()), nested)?;
        record.insert(name, generated);
    }

    Ok(Value::Record(record))
}
