use alloc::sync::Arc;
use core::time::Duration;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::info::Typed;
use crate::transform::{FnTransform, Transform, TransformRegistration};

fn duration_to_string(value: &Duration) -> String {
    format!("{}.{:09}s", value.as_secs(), value.subsec_nanos())
}

/// Accepts `<secs>s` and `<secs>.<fraction>s`, with at most nine fraction digits.
fn duration_from_string(text: String) -> Result<Duration, String> {
    let invalid = || format!("invalid duration `{text}`");
    let body = text.trim().strip_suffix('s').ok_or_else(invalid)?;
    let (secs, fraction) = body.split_once('.').unwrap_or((body, ""));
    if fraction.len() > 9 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let secs = secs.parse::<u64>().map_err(|_| invalid())?;
    let nanos = if fraction.is_empty() {
        0
    } else {
        let scale = 10_u32.pow(9 - fraction.len() as u32);
        fraction.parse::<u32>().map_err(|_| invalid())? * scale
    };
    Ok(Duration::new(secs, nanos))
}

#[allow(clippy::ptr_arg, reason = "matches `fn(&T) -> I`")]
fn path_to_string(value: &PathBuf) -> String {
    value.to_string_lossy().into_owned()
}

fn path_from_string(text: String) -> Result<PathBuf, String> {
    Ok(PathBuf::from(text))
}

/// Milliseconds relative to the UNIX epoch, negative before it.
fn time_to_millis(value: &SystemTime) -> i64 {
    match value.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_millis()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_millis()).map_or(i64::MIN, |ms| -ms),
    }
}

fn time_from_millis(millis: i64) -> Result<SystemTime, String> {
    let offset = Duration::from_millis(millis.unsigned_abs());
    let time = if millis >= 0 {
        UNIX_EPOCH.checked_add(offset)
    } else {
        UNIX_EPOCH.checked_sub(offset)
    };
    time.ok_or_else(|| format!("time out of range: {millis}ms"))
}

fn registration<T: Typed>(transform: impl Transform) -> TransformRegistration {
    TransformRegistration::exact(T::type_info(), Arc::new(transform), i32::MIN)
}

/// The transforms every registry starts with, unless disabled.
pub(crate) fn builtin_transforms() -> Vec<TransformRegistration> {
    vec![
        registration::<Duration>(
            FnTransform::new(duration_to_string, duration_from_string).named("duration"),
        ),
        registration::<PathBuf>(FnTransform::new(path_to_string, path_from_string).named("path")),
        registration::<SystemTime>(
            FnTransform::new(time_to_millis, time_from_millis).named("system_time"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::{builtin_transforms, duration_from_string, duration_to_string};
    use crate::Reflect;
    use core::time::Duration;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn round_trip(value: Box<dyn Reflect>) -> Box<dyn Reflect> {
        let ty = (*value).ty_id();
        let registration = builtin_transforms()
            .into_iter()
            .find(|registration| registration.target().type_id() == ty)
            .unwrap();
        let transform = registration.transform();
        let reduced = transform.reduce(&*value).unwrap();
        assert_eq!((*reduced).ty_id(), transform.intermediate().type_id());
        transform.restore(reduced, registration.target()).unwrap()
    }

    #[test]
    fn duration_text() {
        let value = Duration::new(3, 5_000_000);
        assert_eq!(duration_to_string(&value), "3.005000000s");
        assert_eq!(duration_from_string("3.005s".into()).unwrap(), value);
        assert_eq!(duration_from_string("7s".into()).unwrap(), Duration::from_secs(7));
        assert!(duration_from_string("7".into()).is_err());
        assert!(duration_from_string("1.0000000001s".into()).is_err());
        assert!(duration_from_string("-1s".into()).is_err());
    }

    #[test]
    fn builtins_round_trip() {
        let duration = Duration::new(12, 345);
        let restored = round_trip(Box::new(duration));
        assert_eq!(restored.take::<Duration>().unwrap(), duration);

        let path = PathBuf::from("a/b.txt");
        let restored = round_trip(Box::new(path.clone()));
        assert_eq!(restored.take::<PathBuf>().unwrap(), path);

        let time = UNIX_EPOCH + Duration::from_millis(1_700_000_000_123);
        let restored = round_trip(Box::new(time));
        assert_eq!(restored.take::<SystemTime>().unwrap(), time);

        let before = UNIX_EPOCH - Duration::from_millis(1_500);
        let restored = round_trip(Box::new(before));
        assert_eq!(restored.take::<SystemTime>().unwrap(), before);
    }
}
