use chrono::NaiveDateTime;

use crate::error::BotError;
use crate::models::event::{DayOffset, NormalizedEvent};

/// Hard ceiling on anything handed to a publisher.
pub const MAX_TWEET_CHARS: usize = 240;

/// One row of the reminder policy: exact day offset to template.
pub struct MessageRule {
    pub offset: DayOffset,
    pub render: fn(&NormalizedEvent) -> String,
}

/// The reminder schedule, ordered from the first announcement down to
/// the day of the event. Lookup is exact match on the offset; anything
/// outside the table means there is nothing to say today.
pub const RULES: &[MessageRule] = &[
    MessageRule {
        offset: -7,
        render: announcement,
    },
    MessageRule {
        offset: -4,
        render: invite,
    },
    MessageRule {
        offset: -2,
        render: how_to_join,
    },
    MessageRule {
        offset: -1,
        render: day_before,
    },
    MessageRule {
        offset: 0,
        render: last_minute,
    },
];

/// Renders the reminder matching `offset`, or reports that the event is
/// outside the reminder window. Pure: identical inputs give identical
/// output.
pub fn compose(event: &NormalizedEvent, offset: DayOffset) -> Result<String, BotError> {
    let rule = RULES
        .iter()
        .find(|rule| rule.offset == offset)
        .ok_or(BotError::EventNotInRange { offset })?;

    let tweet = (rule.render)(event);
    let length = tweet.chars().count();
    if length > MAX_TWEET_CHARS {
        return Err(BotError::TweetTooLong {
            length,
            limit: MAX_TWEET_CHARS,
        });
    }
    Ok(tweet)
}

fn announcement(event: &NormalizedEvent) -> String {
    format!(
        "Our next {} will take place on {}, from {} to {}. \
         Send us a DM on the day to receive a link to the private chat on Telegram.",
        event.title,
        format_date(event.start),
        format_hour(event.start),
        format_hour(event.end),
    )
}

fn invite(event: &NormalizedEvent) -> String {
    format!(
        "Join our bi-weekly chat on Telegram next {} ({} to {}), \
         a private and safe get-together for bi survivors of all genders! :)",
        format_weekday(event.start),
        format_hour(event.start),
        format_hour(event.end),
    )
}

fn how_to_join(event: &NormalizedEvent) -> String {
    format!(
        "As always, you can receive the secret link to our chat this {}, {} to {} \
         by sending us a DM! Make sure to download Telegram in advance so you're ready!",
        format_weekday(event.start),
        format_hour(event.start),
        format_hour(event.end),
    )
}

fn day_before(event: &NormalizedEvent) -> String {
    format!(
        "Let us know how you're doing at our bi-weekly chat on Telegram, tomorrow at {}. \
         As always, the chat is moderated by a non-monosexual survivor.",
        format_hour(event.start),
    )
}

fn last_minute(event: &NormalizedEvent) -> String {
    format!(
        "Last minute reminder! Our chat for bi survivors is going live tonight from {} to {}. \
         Send us a DM now to receive the secret link to the chat on Telegram.",
        format_hour(event.start),
        format_hour(event.end),
    )
}

/// "Friday, 23 November 2018"
pub fn format_date(dt: NaiveDateTime) -> String {
    dt.format("%A, %d %B %Y").to_string()
}

/// "23 November"
pub fn format_date_short(dt: NaiveDateTime) -> String {
    dt.format("%d %B").to_string()
}

/// "Friday"
pub fn format_weekday(dt: NaiveDateTime) -> String {
    dt.format("%A").to_string()
}

/// "09.00 PM"
pub fn format_hour(dt: NaiveDateTime) -> String {
    dt.format("%I.%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn chat_event(title: &str) -> NormalizedEvent {
        let date = NaiveDate::from_ymd_opt(2018, 11, 23).unwrap();
        NormalizedEvent {
            title: title.to_string(),
            start: date.and_hms_opt(21, 0, 0).unwrap(),
            end: date.and_hms_opt(23, 0, 0).unwrap(),
            target_date: date,
        }
    }

    #[test]
    fn rule_offsets_are_unique() {
        let offsets: HashSet<DayOffset> = RULES.iter().map(|rule| rule.offset).collect();
        assert_eq!(offsets.len(), RULES.len());
    }

    #[test]
    fn formats_full_date() {
        let dt = NaiveDate::from_ymd_opt(2018, 11, 23)
            .unwrap()
            .and_hms_opt(21, 0, 0)
            .unwrap();
        assert_eq!(format_date(dt), "Friday, 23 November 2018");
    }

    #[test]
    fn formats_short_date() {
        let dt = NaiveDate::from_ymd_opt(2018, 11, 23)
            .unwrap()
            .and_hms_opt(21, 0, 0)
            .unwrap();
        assert_eq!(format_date_short(dt), "23 November");
    }

    #[test]
    fn formats_hour_with_zero_padding() {
        let dt = NaiveDate::from_ymd_opt(2018, 11, 23)
            .unwrap()
            .and_hms_opt(21, 0, 0)
            .unwrap();
        assert_eq!(format_hour(dt), "09.00 PM");
    }

    #[test]
    fn week_before_renders_the_announcement() {
        let tweet = compose(&chat_event("test summary"), -7).expect("rule should match");
        assert_eq!(
            tweet,
            "Our next test summary will take place on Friday, 23 November 2018, \
             from 09.00 PM to 11.00 PM. \
             Send us a DM on the day to receive a link to the private chat on Telegram."
        );
    }

    #[test]
    fn day_of_event_renders_the_last_minute_reminder() {
        let tweet = compose(&chat_event("test summary"), 0).expect("rule should match");
        assert!(tweet.starts_with("Last minute reminder!"));
        assert!(tweet.contains("from 09.00 PM to 11.00 PM"));
    }

    #[test]
    fn offset_outside_the_table_is_not_in_range() {
        let err = compose(&chat_event("test summary"), -9).unwrap_err();
        assert!(matches!(err, BotError::EventNotInRange { offset: -9 }));
    }

    #[test]
    fn oversized_render_is_rejected() {
        let title = "t".repeat(MAX_TWEET_CHARS);
        let err = compose(&chat_event(&title), -7).unwrap_err();
        assert!(matches!(
            err,
            BotError::TweetTooLong { length, limit }
                if length > MAX_TWEET_CHARS && limit == MAX_TWEET_CHARS
        ));
    }

    #[test]
    fn compose_is_deterministic() {
        let event = chat_event("test summary");
        let first = compose(&event, -4).expect("rule should match");
        let second = compose(&event, -4).expect("rule should match");
        assert_eq!(first, second);
    }
}
