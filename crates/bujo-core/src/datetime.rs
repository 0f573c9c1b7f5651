use chrono::{
  DateTime,
  NaiveDate,
  NaiveDateTime,
  NaiveTime,
  TimeZone,
  Utc
};
use chrono_tz::Tz;

use crate::model::ModelError;

const MS_PER_DAY: f64 = 86_400_000.0;

pub fn parse_timezone(
  name: &str
) -> Result<Tz, ModelError> {
  name.trim().parse::<Tz>().map_err(
    |_| {
      ModelError::UnknownTimezone(
        name.to_string()
      )
    }
  )
}

/// Resolves a wire due date (`YYYY-MM-DD`, optional `HH:MM`, optional
/// IANA zone) to an instant. Dates without a time fall on local
/// midnight.
pub fn parse_due(
  date: &str,
  time: Option<&str>,
  timezone: Option<&str>,
  default_tz: Tz
) -> Result<DateTime<Utc>, ModelError> {
  let day = NaiveDate::parse_from_str(
    date.trim(),
    "%Y-%m-%d"
  )
  .map_err(|_| {
    ModelError::InvalidDueDate(
      date.to_string()
    )
  })?;

  let clock = match time
    .map(str::trim)
    .filter(|value| !value.is_empty())
  {
    | Some(value) => {
      NaiveTime::parse_from_str(
        value, "%H:%M"
      )
      .map_err(|_| {
        ModelError::InvalidDueTime(
          value.to_string()
        )
      })?
    }
    | None => NaiveTime::MIN
  };

  let tz = match timezone
    .map(str::trim)
    .filter(|value| !value.is_empty())
  {
    | Some(name) => parse_timezone(name)?,
    | None => default_tz
  };

  let naive =
    NaiveDateTime::new(day, clock);
  tz.from_local_datetime(&naive)
    .earliest()
    .map(|local| {
      local.with_timezone(&Utc)
    })
    .ok_or_else(|| {
      ModelError::NonexistentLocalTime {
        local:    naive.to_string(),
        timezone: tz.name().to_string()
      }
    })
}

/// Relative phrase for `target` seen from `now`, e.g. "in 2 days" or
/// "an hour ago".
pub fn from_now(
  target: DateTime<Utc>,
  now: DateTime<Utc>
) -> String {
  let delta_ms = target
    .signed_duration_since(now)
    .num_milliseconds();
  let phrase = relative_phrase(
    delta_ms.unsigned_abs() as f64
  );
  if delta_ms > 0 {
    format!("in {phrase}")
  } else {
    format!("{phrase} ago")
  }
}

fn relative_phrase(ms: f64) -> String {
  let seconds = (ms / 1000.0).round();
  let minutes = (ms / 60_000.0).round();
  let hours = (ms / 3_600_000.0).round();
  let total_days = ms / MS_PER_DAY;
  let days = total_days.round();
  let total_months =
    total_days * 4800.0 / 146_097.0;
  let months = total_months.round();
  let years = (total_months / 12.0).round();

  if seconds <= 44.0 {
    "a few seconds".to_string()
  } else if seconds < 45.0 {
    format!("{seconds} seconds")
  } else if minutes <= 1.0 {
    "a minute".to_string()
  } else if minutes < 45.0 {
    format!("{minutes} minutes")
  } else if hours <= 1.0 {
    "an hour".to_string()
  } else if hours < 22.0 {
    format!("{hours} hours")
  } else if days <= 1.0 {
    "a day".to_string()
  } else if days < 26.0 {
    format!("{days} days")
  } else if months <= 1.0 {
    "a month".to_string()
  } else if months < 11.0 {
    format!("{months} months")
  } else if years <= 1.0 {
    "a year".to_string()
  } else {
    format!("{years} years")
  }
}

#[cfg(test)]
mod tests {
  use chrono::{
    Duration,
    TimeZone,
    Utc
  };

  use super::*;

  fn now() -> DateTime<Utc> {
    Utc
      .with_ymd_and_hms(
        2026, 3, 10, 9, 30, 0
      )
      .single()
      .expect("valid now")
  }

  #[test]
  fn phrases_future_and_past() {
    let now = now();
    assert_eq!(
      from_now(
        now + Duration::days(2),
        now
      ),
      "in 2 days"
    );
    assert_eq!(
      from_now(
        now - Duration::hours(3),
        now
      ),
      "3 hours ago"
    );
    assert_eq!(
      from_now(
        now + Duration::seconds(10),
        now
      ),
      "in a few seconds"
    );
    assert_eq!(
      from_now(now, now),
      "a few seconds ago"
    );
  }

  #[test]
  fn phrases_respect_unit_thresholds() {
    let now = now();
    assert_eq!(
      from_now(
        now + Duration::seconds(80),
        now
      ),
      "in a minute"
    );
    assert_eq!(
      from_now(
        now + Duration::minutes(70),
        now
      ),
      "in an hour"
    );
    assert_eq!(
      from_now(
        now + Duration::hours(30),
        now
      ),
      "in a day"
    );
    assert_eq!(
      from_now(
        now + Duration::days(40),
        now
      ),
      "in a month"
    );
    assert_eq!(
      from_now(
        now - Duration::days(100),
        now
      ),
      "3 months ago"
    );
    assert_eq!(
      from_now(
        now + Duration::days(400),
        now
      ),
      "in a year"
    );
    assert_eq!(
      from_now(
        now + Duration::days(1200),
        now
      ),
      "in 3 years"
    );
  }

  #[test]
  fn parses_due_with_time_and_zone() {
    let due = parse_due(
      "2026-03-12",
      Some("18:45"),
      Some("America/New_York"),
      Tz::UTC
    )
    .expect("parse due");
    assert_eq!(
      due,
      Utc
        .with_ymd_and_hms(
          2026, 3, 12, 22, 45, 0
        )
        .single()
        .expect("valid instant")
    );
  }

  #[test]
  fn date_only_due_falls_on_default_zone_midnight()
  {
    let due = parse_due(
      "2026-03-12",
      None,
      None,
      Tz::UTC
    )
    .expect("parse due");
    assert_eq!(
      due.format("%Y-%m-%dT%H:%M")
        .to_string(),
      "2026-03-12T00:00"
    );
  }

  #[test]
  fn rejects_malformed_due_parts() {
    assert_eq!(
      parse_due(
        "12/03/2026",
        None,
        None,
        Tz::UTC
      ),
      Err(ModelError::InvalidDueDate(
        "12/03/2026".to_string()
      ))
    );
    assert_eq!(
      parse_due(
        "2026-03-12",
        Some("7pm"),
        None,
        Tz::UTC
      ),
      Err(ModelError::InvalidDueTime(
        "7pm".to_string()
      ))
    );
    assert_eq!(
      parse_due(
        "2026-03-12",
        None,
        Some("Mars/Olympus"),
        Tz::UTC
      ),
      Err(ModelError::UnknownTimezone(
        "Mars/Olympus".to_string()
      ))
    );
  }
}
