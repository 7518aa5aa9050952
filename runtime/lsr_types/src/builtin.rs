//! Built-in scalar types.
//!
//! | Type     | Accepts          |
//! |----------|------------------|
//! | `i32`    | `Data::Int32`    |
//! | `i64`    | `Data::Int64`    |
//! | `bool`   | `Data::Bool`     |
//! | `string` | `Data::Str`      |
//!
//! The first access to any built-in type also installs the standard
//! coercions between them. Pairs without a direct edge (`bool -> i64`,
//! `string -> i32`, ...) are reached through the path search.
//!
//! [`type_system_teardown`](crate::type_system_teardown) detaches the
//! built-in types like every other type. The next access, or
//! [`type_system_init`](crate::type_system_init), registers them again as
//! new identities and installs their coercions anew.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::registry::revision;
use crate::{Data, Type, TypeCell, TypeDef};

pub const INT32_NAME: &str = "i32";
pub const INT64_NAME: &str = "i64";
pub const BOOLEAN_NAME: &str = "bool";
pub const STRING_NAME: &str = "string";

static INT32: TypeCell = TypeCell::new(int32_def);
static INT64: TypeCell = TypeCell::new(int64_def);
static BOOLEAN: TypeCell = TypeCell::new(boolean_def);
static STRING: TypeCell = TypeCell::new(string_def);

const NOT_INSTALLED: u64 = u64::MAX;

/// Registry revision the standard coercions were last installed in.
static INSTALLED: AtomicU64 = AtomicU64::new(NOT_INSTALLED);
static INSTALLING: Mutex<()> = parking_lot::const_mutex(());

fn int32_def() -> TypeDef {
    TypeDef::new(INT32_NAME).with_validator(|data| matches!(data, Data::Int32(_)))
}

fn int64_def() -> TypeDef {
    TypeDef::new(INT64_NAME).with_validator(|data| matches!(data, Data::Int64(_)))
}

fn boolean_def() -> TypeDef {
    TypeDef::new(BOOLEAN_NAME).with_validator(|data| matches!(data, Data::Bool(_)))
}

fn string_def() -> TypeDef {
    TypeDef::new(STRING_NAME).with_validator(|data| matches!(data, Data::Str(_)))
}

/// The 32-bit integer type.
pub fn int32() -> Type {
    install();
    INT32.get()
}

/// The 64-bit integer type.
pub fn int64() -> Type {
    install();
    INT64.get()
}

/// The boolean type.
pub fn boolean() -> Type {
    install();
    BOOLEAN.get()
}

/// The string type.
pub fn string() -> Type {
    install();
    STRING.get()
}

/// Register the built-in types and their coercions in the current registry
/// revision. Cheap once done.
pub(crate) fn install() {
    let current = revision();
    if INSTALLED.load(Ordering::Acquire) == current {
        return;
    }

    let _guard = INSTALLING.lock();

    // Double-check after acquiring the lock
    if INSTALLED.load(Ordering::Acquire) == current {
        return;
    }

    let int32 = INT32.get();
    let int64 = INT64.get();
    let boolean = BOOLEAN.get();
    let string = STRING.get();

    int32.add_coercion(&int64, |data| data.as_i32().map(|v| Data::Int64(i64::from(v))));
    int64.add_coercion(&int32, |data| {
        data.as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(Data::Int32)
    });
    boolean.add_coercion(&int32, |data| data.as_bool().map(|v| Data::Int32(i32::from(v))));
    int32.add_coercion(&boolean, |data| data.as_i32().map(|v| Data::Bool(v != 0)));

    int32.add_coercion(&string, |data| data.as_i32().map(|v| Data::from(v.to_string())));
    int64.add_coercion(&string, |data| data.as_i64().map(|v| Data::from(v.to_string())));
    boolean.add_coercion(&string, |data| data.as_bool().map(|v| Data::from(v.to_string())));

    string.add_coercion(&int64, |data| {
        data.as_str()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .map(Data::Int64)
    });
    string.add_coercion(&boolean, |data| match data.as_str() {
        Some("true") => Some(Data::Bool(true)),
        Some("false") => Some(Data::Bool(false)),
        _ => None,
    });

    INSTALLED.store(current, Ordering::Release);
    tracing::debug!(revision = current, "built-in coercions installed");
}

#[cfg(test)]
mod tests;
