//! Crawl position over (date, game number) pairs.
//!
//! The feed publishes one document per game, addressed by the calendar
//! date and the ordinal number of the game on that date. The cursor
//! walks game numbers within a day until the feed reports nothing for
//! the next number, then rolls over to the next day. The crawl is a
//! live process: it terminates when the date reaches "tomorrow"
//! relative to the wall clock, re-checked on every iteration, so a run
//! that crosses midnight keeps going into the newly valid day.

use chrono::{Duration, NaiveDate, Utc};

/// Address of one remote game document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameKey {
    pub date: NaiveDate,
    pub game_number: u32,
}

impl GameKey {
    /// Fixed-width feed addressing token: `YYYYMMDD` plus a two-digit
    /// game number, no separators.
    pub fn feed_token(&self) -> String {
        format!("{}{:02}", self.date.format("%Y%m%d"), self.game_number)
    }
}

/// Stateful iterator over game keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameKeyCursor {
    date: NaiveDate,
    game_number: u32,
}

impl GameKeyCursor {
    /// Start a cursor at game 0 of the given date
    pub fn new(start_date: NaiveDate) -> Self {
        Self { date: start_date, game_number: 0 }
    }

    /// The key the crawl should fetch next
    pub fn current(&self) -> GameKey {
        GameKey { date: self.date, game_number: self.game_number }
    }

    /// Move past the current key. A found game means the same date may
    /// hold another game; a miss means the day is done.
    pub fn advance(&mut self, found: bool) {
        if found {
            self.game_number += 1;
        } else {
            self.date = self.date + Duration::days(1);
            self.game_number = 0;
        }
    }

    /// True when the cursor has caught up with the live window: the
    /// current date is the day after today.
    pub fn is_exhausted(&self) -> bool {
        self.is_exhausted_at(Utc::now().date_naive())
    }

    fn is_exhausted_at(&self, today: NaiveDate) -> bool {
        self.date == today + Duration::days(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn found_advances_game_number_only() {
        let mut cursor = GameKeyCursor::new(date(2018, 8, 1));
        cursor.advance(true);
        assert_eq!(cursor.current(), GameKey { date: date(2018, 8, 1), game_number: 1 });
        cursor.advance(true);
        assert_eq!(cursor.current(), GameKey { date: date(2018, 8, 1), game_number: 2 });
    }

    #[test]
    fn miss_rolls_to_next_day_and_resets_game_number() {
        let mut cursor = GameKeyCursor::new(date(2018, 8, 1));
        cursor.advance(true);
        cursor.advance(true);
        cursor.advance(false);
        assert_eq!(cursor.current(), GameKey { date: date(2018, 8, 2), game_number: 0 });
    }

    #[test]
    fn day_rollover_crosses_month_boundaries() {
        let mut cursor = GameKeyCursor::new(date(2018, 8, 31));
        cursor.advance(false);
        assert_eq!(cursor.current().date, date(2018, 9, 1));
    }

    #[test]
    fn exhausted_exactly_on_tomorrow() {
        let today = date(2018, 8, 10);
        assert!(!GameKeyCursor::new(date(2018, 8, 10)).is_exhausted_at(today));
        assert!(GameKeyCursor::new(date(2018, 8, 11)).is_exhausted_at(today));
        assert!(!GameKeyCursor::new(date(2018, 8, 9)).is_exhausted_at(today));
    }

    #[test]
    fn exhaustion_window_follows_the_clock() {
        // If the wall clock advances a day mid-run, a cursor sitting on
        // what used to be "tomorrow" becomes fetchable again.
        let cursor = GameKeyCursor::new(date(2018, 8, 11));
        assert!(cursor.is_exhausted_at(date(2018, 8, 10)));
        assert!(!cursor.is_exhausted_at(date(2018, 8, 11)));
    }

    #[test]
    fn feed_token_is_fixed_width() {
        let key = GameKey { date: date(2018, 8, 1), game_number: 0 };
        assert_eq!(key.feed_token(), "2018080100");

        let key = GameKey { date: date(2018, 12, 25), game_number: 13 };
        assert_eq!(key.feed_token(), "2018122513");
    }
}
