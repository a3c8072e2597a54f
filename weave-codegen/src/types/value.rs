//! Literal values of the input model.

use std::rc::Rc;

use crate::parts::PartWriter;

/// A model value to write as TypeScript source.
#[derive(Debug, Clone, PartialEq)]
pub enum TsValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Number(f64),
    BigInt(i128),
    String(String),
    /// A Guid in its hyphenated form.
    Guid(String),
    /// An ISO 8601 date and time.
    DateTime(String),
    /// An enum member, by name.
    EnumMember(String),
}

/// Writes a value of a type, given the type name.
///
/// Returns `false` without writing anything when the value does not fit
/// the type.
pub type ValueWriter = Rc<dyn Fn(&mut PartWriter<'_>, &str, &TsValue) -> bool>;

/// Source text of a number, `NaN` and the infinities included.
pub fn number_literal(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        value.to_string()
    }
}
