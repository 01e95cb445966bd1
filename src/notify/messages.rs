//! Message texts sent to participants.

use super::Introduction;
use crate::domain::{Group, Participant, Round};

/// Date format used in messages, e.g. `"Monday, Jan 5, 2026"`.
const DATE_FORMAT: &str = "%A, %b %-d, %Y";

/// Prefixes every line with `> ` so multi-line intros render as a quote.
#[must_use]
pub fn blockquote(text: &str) -> String {
    if text.trim().is_empty() {
        return "> _(no introduction yet)_".to_string();
    }
    text.lines()
        .map(|line| format!("> {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Asks a member to opt in to a new round.
#[must_use]
pub fn availability_request(participant: &Participant, group: &Group, round: &Round) -> String {
    format!(
        "Hey {}, want to be paired with someone new in #{} this round ({} – {})? \
         Reply yes to opt in, or no to sit this one out.",
        participant.given_name,
        group.name,
        round.start_date.format(DATE_FORMAT),
        round.end_date.format(DATE_FORMAT),
    )
}

/// Group message introducing the two members of a pair.
#[must_use]
pub fn introduction(intro: &Introduction) -> String {
    format!(
        "Hey {first} and {second}, you've been paired through #{group} this round! \
         Here's a little about each of you in your own words.\n\n\
         *{first}*:\n{first_intro}\n\n\
         *{second}*:\n{second_intro}\n\n\
         Pick a time that works for both of you to meet.",
        first = intro.first.display_name(),
        second = intro.second.display_name(),
        group = intro.group_name,
        first_intro = blockquote(&intro.first.intro),
        second_intro = blockquote(&intro.second.intro),
    )
}

/// Follow-up asking whether a member met their previous partner.
#[must_use]
pub fn met_follow_up(participant: &Participant, partner: &Participant, group: &Group) -> String {
    format!(
        "Hey {}, last time in #{} you were paired with {}. Did you get a chance to meet?",
        participant.given_name,
        group.name,
        partner.display_name(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PairId, RoundId};

    #[test]
    fn blockquote_prefixes_each_line() {
        assert_eq!(blockquote("one\ntwo"), "> one\n> two");
        assert!(blockquote("  ").contains("no introduction"));
    }

    #[test]
    fn introduction_mentions_both_members() {
        let mut first = Participant::new("ada", "Ada", "Lovelace");
        first.intro = "I write programs for engines.".to_string();
        let second = Participant::new("alan", "Alan", "Turing");
        let intro = Introduction {
            pair_id: PairId::new(),
            round_id: RoundId::new(),
            group_name: "coffee".to_string(),
            first,
            second,
        };
        let text = introduction(&intro);
        assert!(text.contains("@ada"));
        assert!(text.contains("@alan"));
        assert!(text.contains("> I write programs for engines."));
        assert!(text.contains("#coffee"));
    }

    #[test]
    fn availability_request_names_the_round() {
        let p = Participant::new("ada", "Ada", "Lovelace");
        let group = Group::new("coffee", "C001");
        let start = chrono::NaiveDate::from_ymd_opt(2026, 1, 5).unwrap_or_default();
        let round = Round::new(group.id, start, 4);
        let text = availability_request(&p, &group, &round);
        assert!(text.starts_with("Hey Ada"));
        assert!(text.contains("Monday, Jan 5, 2026"));
        assert!(text.contains("Friday, Jan 9, 2026"));
    }
}
