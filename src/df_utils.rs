use crate::error::FrameError;
use polars::prelude::*;
use serde_json::Value;
use std::{io::Cursor, ops::Deref};

/// Dataframe rows as a JSON array of objects, nulls kept as `null`
#[inline]
pub fn df_to_json(df: &mut DataFrame) -> Result<Value, FrameError> {
    let mut file = Cursor::new(Vec::new());
    JsonWriter::new(&mut file)
        .with_json_format(JsonFormat::Json)
        .finish(df)?;
    let df_json = serde_json::from_slice(&file.into_inner())?;
    Ok(df_json)
}

/// Float column as optional values
pub fn column_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().collect())
}

/// Last value of a float column, `None` when empty or null
pub fn last_value(df: &DataFrame, name: &str) -> PolarsResult<Option<f64>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    let ca = column.f64()?;
    Ok(ca.len().checked_sub(1).and_then(|i| ca.get(i)))
}

/// Transitive type to make syntastic sugar for converting Dataframe to JSON
pub struct JsonDataframe(Value);

impl Deref for JsonDataframe {
    type Target = Value;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<&DataFrame> for JsonDataframe {
    type Error = FrameError;

    fn try_from(value: &DataFrame) -> Result<Self, Self::Error> {
        let df_json = df_to_json(&mut value.clone())?;
        Ok(JsonDataframe(df_json))
    }
}

impl From<JsonDataframe> for Value {
    fn from(value: JsonDataframe) -> Self {
        value.0
    }
}
