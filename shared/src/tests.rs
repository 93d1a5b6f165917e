#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use time::macros::datetime;

    use crate::election::{backfill_votes, seed_votes, BallotError, ElectionStatus, EligibleVoters};
    use crate::models::{Candidate, CandidateId, ElectionConfig, ElectionData};
    use crate::validation::{normalize_voter_id, parse_config_update, ConfigError};

    fn candidate(id: CandidateId, position: &str) -> Candidate {
        Candidate {
            id,
            name: format!("Candidate {id}"),
            position: position.to_owned(),
            bio: String::new(),
            avatar: String::new(),
        }
    }

    fn selections(pairs: &[(&str, Option<CandidateId>)]) -> HashMap<String, Option<CandidateId>> {
        pairs
            .iter()
            .map(|(position, choice)| (position.to_string(), *choice))
            .collect()
    }

    fn seeded_data(candidates: &[Candidate]) -> ElectionData {
        ElectionData {
            votes: seed_votes(candidates),
            voters: HashMap::new(),
        }
    }

    fn config() -> ElectionConfig {
        ElectionConfig {
            start_time: datetime!(2025-06-01 08:00 UTC),
            end_time: datetime!(2025-06-02 08:00 UTC),
        }
    }

    #[test]
    fn test_status_window_boundaries() {
        let config = config();
        assert_eq!(
            ElectionStatus::at(&config, datetime!(2025-06-01 07:59 UTC)),
            ElectionStatus::Pending
        );
        assert_eq!(
            ElectionStatus::at(&config, config.start_time),
            ElectionStatus::Active
        );
        assert_eq!(
            ElectionStatus::at(&config, datetime!(2025-06-01 20:00 UTC)),
            ElectionStatus::Active
        );
        assert_eq!(
            ElectionStatus::at(&config, config.end_time),
            ElectionStatus::Active
        );
        assert_eq!(
            ElectionStatus::at(&config, datetime!(2025-06-02 08:01 UTC)),
            ElectionStatus::Ended
        );
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ElectionStatus::Pending.to_string(), "pending");
        assert_eq!(ElectionStatus::Active.to_string(), "active");
        assert_eq!(ElectionStatus::Ended.to_string(), "ended");
    }

    #[test]
    fn test_voter_id_normalization() {
        assert_eq!(normalize_voter_id("  a1 "), "A1");
        assert_eq!(normalize_voter_id("nacos/2024/001"), "NACOS/2024/001");
        assert_eq!(normalize_voter_id("   "), "");
    }

    #[test]
    fn test_eligibility_is_case_insensitive() {
        let roll = EligibleVoters::from_list(["a1", " B2 ", ""]);
        assert_eq!(roll.len(), 2);
        assert!(roll.contains("A1"));
        assert!(roll.contains("B2"));
        assert!(!roll.contains("C3"));
    }

    #[test]
    fn test_seed_votes_covers_every_pair() {
        let candidates = [
            candidate(1, "President"),
            candidate(2, "President"),
            candidate(3, "Secretary"),
        ];
        let votes = seed_votes(&candidates);
        assert_eq!(votes["President"][&1], 0);
        assert_eq!(votes["President"][&2], 0);
        assert_eq!(votes["Secretary"][&3], 0);
        assert_eq!(votes.len(), 2);
    }

    #[test]
    fn test_backfill_preserves_existing_counts() {
        let candidates = [
            candidate(1, "President"),
            candidate(2, "President"),
            candidate(3, "Secretary"),
        ];
        let mut votes = serde_json::from_value(serde_json::json!({
            "President": { "1": 7 }
        }))
        .unwrap();
        backfill_votes(&mut votes, &candidates);
        assert_eq!(votes["President"][&1], 7, "saved count must survive");
        assert_eq!(votes["President"][&2], 0);
        assert_eq!(votes["Secretary"][&3], 0);
    }

    #[test]
    fn test_single_ballot_updates_tally_and_record() {
        let candidates = [candidate(1, "President"), candidate(2, "President")];
        let mut data = seeded_data(&candidates);

        let accepted = data
            .record_ballot("A1", &selections(&[("President", Some(1))]), &candidates)
            .unwrap();
        assert_eq!(accepted, vec!["President".to_string()]);
        assert_eq!(data.votes["President"][&1], 1);
        assert_eq!(data.votes["President"][&2], 0);
        assert_eq!(data.voters["A1"]["President"], true);
    }

    #[test]
    fn test_second_ballot_for_same_position_is_rejected() {
        let candidates = [candidate(1, "President"), candidate(2, "President")];
        let mut data = seeded_data(&candidates);

        data.record_ballot("A1", &selections(&[("President", Some(1))]), &candidates)
            .unwrap();
        let err = data
            .record_ballot("A1", &selections(&[("President", Some(2))]), &candidates)
            .unwrap_err();
        assert_eq!(err, BallotError::NoValidVotes);
        assert_eq!(data.votes["President"][&1], 1);
        assert_eq!(data.votes["President"][&2], 0, "tallies must be unchanged");
    }

    #[test]
    fn test_partial_ballot_records_only_fresh_positions() {
        let candidates = [
            candidate(1, "President"),
            candidate(2, "Secretary"),
        ];
        let mut data = seeded_data(&candidates);

        data.record_ballot("A1", &selections(&[("President", Some(1))]), &candidates)
            .unwrap();
        let accepted = data
            .record_ballot(
                "A1",
                &selections(&[("President", Some(1)), ("Secretary", Some(2))]),
                &candidates,
            )
            .unwrap();
        assert_eq!(accepted, vec!["Secretary".to_string()]);
        assert_eq!(data.votes["President"][&1], 1);
        assert_eq!(data.votes["Secretary"][&2], 1);
    }

    #[test]
    fn test_unknown_candidate_and_blank_selection_are_skipped() {
        let candidates = [candidate(1, "President")];
        let mut data = seeded_data(&candidates);

        let err = data
            .record_ballot(
                "A1",
                &selections(&[
                    ("President", Some(99)),  // no such candidate
                    ("Treasurer", Some(1)),   // no such position
                    ("Secretary", None),      // left blank
                ]),
                &candidates,
            )
            .unwrap_err();
        assert_eq!(err, BallotError::NoValidVotes);
        assert_eq!(data.votes["President"][&1], 0);
        assert!(data.voters.is_empty(), "a rejected ballot must leave no record");
    }

    #[test]
    fn test_tallies_match_voter_records_across_sequence() {
        let candidates = [
            candidate(1, "President"),
            candidate(2, "President"),
            candidate(3, "Secretary"),
        ];
        let mut data = seeded_data(&candidates);

        let ballots = [
            ("A1", selections(&[("President", Some(1)), ("Secretary", Some(3))])),
            ("B2", selections(&[("President", Some(2))])),
            ("C3", selections(&[("President", Some(1))])),
            ("B2", selections(&[("Secretary", Some(3))])),
        ];
        for (voter, ballot) in &ballots {
            data.record_ballot(voter, ballot, &candidates).unwrap();
        }

        // every position's tally total equals the number of voters recorded
        // as having voted that position
        for (position, tallies) in &data.votes {
            let position_total: u64 = tallies.values().sum();
            let voters_for_position = data
                .voters
                .values()
                .filter(|record| record.get(position).copied().unwrap_or(false))
                .count() as u64;
            assert_eq!(position_total, voters_for_position, "position {position}");
        }
    }

    #[test]
    fn test_two_candidate_race_single_voter_cannot_switch() {
        let candidates = [candidate(1, "President"), candidate(2, "President")];
        let mut data = seeded_data(&candidates);

        data.record_ballot("A1", &selections(&[("President", Some(1))]), &candidates)
            .unwrap();
        assert_eq!(data.votes["President"][&1], 1);
        assert_eq!(data.votes["President"][&2], 0);
        assert_eq!(data.voters["A1"]["President"], true);

        let err = data
            .record_ballot("A1", &selections(&[("President", Some(2))]), &candidates)
            .unwrap_err();
        assert_eq!(err.to_string(), "No valid votes to record");
        assert_eq!(data.votes["President"][&1], 1);
        assert_eq!(data.votes["President"][&2], 0);
    }

    #[test]
    fn test_reset_clears_records_and_zeroes_tallies() {
        let candidates = [candidate(1, "President"), candidate(2, "Secretary")];
        let mut data = seeded_data(&candidates);
        data.record_ballot(
            "A1",
            &selections(&[("President", Some(1)), ("Secretary", Some(2))]),
            &candidates,
        )
        .unwrap();

        data.reset(&candidates);
        assert!(data.voters.is_empty());
        assert_eq!(data.votes["President"][&1], 0);
        assert_eq!(data.votes["Secretary"][&2], 0);
    }

    #[test]
    fn test_config_update_validation() {
        let config = parse_config_update("2025-06-01T08:00:00Z", "2025-06-02T08:00:00Z").unwrap();
        assert!(config.start_time < config.end_time);

        assert!(matches!(
            parse_config_update("2025-06-02T08:00:00Z", "2025-06-01T08:00:00Z"),
            Err(ConfigError::EmptyWindow)
        ));
        assert!(matches!(
            parse_config_update("2025-06-01T08:00:00Z", "2025-06-01T08:00:00Z"),
            Err(ConfigError::EmptyWindow)
        ));
        assert!(matches!(
            parse_config_update("yesterday", "2025-06-02T08:00:00Z"),
            Err(ConfigError::Unparsable(_))
        ));
    }

    #[test]
    fn test_election_data_json_shape() {
        let candidates = [candidate(1, "President"), candidate(2, "President")];
        let mut data = seeded_data(&candidates);
        data.record_ballot("A1", &selections(&[("President", Some(1))]), &candidates)
            .unwrap();

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["votes"]["President"]["1"], 1);
        assert_eq!(json["votes"]["President"]["2"], 0);
        assert_eq!(json["voters"]["A1"]["President"], true);
    }
}
