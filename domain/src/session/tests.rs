use std::time::Duration;

use crate::*;

fn test_config() -> RoundConfig {
    RoundConfig {
        deadline: Duration::from_secs(15),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum ExpectedOutcome {
    Ok,
    InvalidStatus { action: &'static str },
    UnknownParticipant,
    StaleDeadline,
}

struct TestHarness {
    session: SessionState,
    players: Vec<Participant>,
    next_timer: u64,
    last_result: Result<Vec<SessionEffect>, SessionError>,
}

impl TestHarness {
    fn new() -> Self {
        Self {
            session: SessionState::new(SessionId::new(), test_config()),
            players: vec![Participant::new("A"), Participant::new("B")],
            next_timer: 0,
            last_result: Ok(vec![]),
        }
    }

    /// Both players seated and round 1 armed.
    fn paired() -> Self {
        let mut harness = Self::new();
        harness.join(0).join(1);
        harness
    }

    fn id(
        &self,
        player_idx: usize,
    ) -> ParticipantId {
        self.players[player_idx].id()
    }

    fn apply(
        &mut self,
        action: SessionAction,
    ) -> &mut Self {
        self.last_result = self.session.handle(action);
        // Answer arm requests the way a clock would.
        if let Ok(effects) = &self.last_result {
            let arms = effects
                .iter()
                .filter(|e| matches!(e, SessionEffect::ArmDeadline { .. }))
                .count();
            for _ in 0..arms {
                self.next_timer += 1;
                self.session.deadline_armed(TimerId(self.next_timer));
            }
        }
        self
    }

    fn join(
        &mut self,
        player_idx: usize,
    ) -> &mut Self {
        let participant = self.players[player_idx].clone();
        self.apply(SessionAction::Join(participant))
    }

    fn submit(
        &mut self,
        player_idx: usize,
        word: &str,
    ) -> &mut Self {
        let participant_id = self.id(player_idx);
        self.apply(SessionAction::Submit {
            participant_id,
            word: word.to_string(),
        })
    }

    fn deadline(&mut self) -> &mut Self {
        let timer = TimerId(self.next_timer);
        self.apply(SessionAction::DeadlineElapsed(timer))
    }

    fn disconnect(
        &mut self,
        player_idx: usize,
    ) -> &mut Self {
        let participant_id = self.id(player_idx);
        self.apply(SessionAction::Disconnect(participant_id))
    }

    fn effects(&self) -> &[SessionEffect] {
        self.last_result.as_ref().expect("last action failed")
    }

    fn events_for(
        &self,
        player_idx: usize,
    ) -> Vec<SessionEvent> {
        let participant = self.id(player_idx);
        self.effects()
            .iter()
            .filter_map(|e| match e {
                SessionEffect::Notify { participant_id, event } if *participant_id == participant => {
                    Some(event.clone())
                }
                _ => None,
            })
            .collect()
    }

    #[track_caller]
    fn check_outcome(
        &self,
        expected: ExpectedOutcome,
    ) -> &Self {
        match (&self.last_result, &expected) {
            (Ok(_), ExpectedOutcome::Ok) => {}
            (Err(SessionError::InvalidStatus { action, .. }), ExpectedOutcome::InvalidStatus { action: exp_action }) => {
                assert_eq!(*action, *exp_action, "InvalidStatus: action mismatch");
            }
            (Err(SessionError::UnknownParticipant(_)), ExpectedOutcome::UnknownParticipant) => {}
            (Err(SessionError::StaleDeadline(_)), ExpectedOutcome::StaleDeadline) => {}
            _ => {
                panic!("Outcome mismatch: expected {:?}, got {:?}", expected, self.last_result);
            }
        }
        self
    }

    #[track_caller]
    fn check_ok(&self) -> &Self {
        self.check_outcome(ExpectedOutcome::Ok)
    }

    #[track_caller]
    fn check_status(
        &self,
        expected: SessionStatus,
    ) -> &Self {
        assert_eq!(
            self.session.status, expected,
            "Expected status {:?}, got {:?}",
            expected, self.session.status
        );
        self
    }

    #[track_caller]
    fn check_round(
        &self,
        expected: u32,
    ) -> &Self {
        assert_eq!(self.session.round, expected, "Expected round {}", expected);
        self
    }

    #[track_caller]
    fn check_closed(
        &self,
        expected: SessionOutcome,
    ) -> &Self {
        assert_eq!(
            self.effects().last(),
            Some(&SessionEffect::Close(expected)),
            "Expected session to close as {:?}",
            expected
        );
        self
    }

    #[track_caller]
    fn check_cancels(
        &self,
        timer: u64,
    ) -> &Self {
        assert!(
            self.effects().contains(&SessionEffect::CancelDeadline(TimerId(timer))),
            "Expected timer {} to be cancelled, effects: {:?}",
            timer,
            self.effects()
        );
        self
    }
}

mod join {
    use super::*;

    #[test]
    fn first_join_waits() {
        let mut h = TestHarness::new();
        h.join(0).check_ok().check_status(SessionStatus::AwaitingOpponent);

        let events = h.events_for(0);
        assert!(matches!(events[0], SessionEvent::Joined { .. }));
        assert_eq!(events[1], SessionEvent::Waiting);
        assert!(h.session.is_waiting_for_opponent());
        assert_eq!(h.session.deadline, None);
    }

    #[test]
    fn second_join_starts_round_one() {
        let mut h = TestHarness::new();
        h.join(0).join(1).check_ok().check_status(SessionStatus::RoundInProgress).check_round(1);

        assert!(h.effects().contains(&SessionEffect::ArmDeadline {
            delay: Duration::from_secs(15)
        }));
        assert_eq!(h.session.deadline, Some(TimerId(1)));

        let a_events = h.events_for(0);
        assert_eq!(
            a_events,
            vec![
                SessionEvent::OpponentInfo {
                    nickname: "B".to_string()
                },
                SessionEvent::RoundStart {
                    round: 1,
                    opponent_nickname: "B".to_string(),
                    deadline_secs: 15,
                },
            ]
        );
        let b_events = h.events_for(1);
        assert!(matches!(b_events[0], SessionEvent::Joined { .. }));
        assert!(b_events.contains(&SessionEvent::OpponentInfo {
            nickname: "A".to_string()
        }));
    }

    #[test]
    fn third_join_is_rejected() {
        let mut h = TestHarness::paired();
        let intruder = Participant::new("C");
        h.apply(SessionAction::Join(intruder))
            .check_outcome(ExpectedOutcome::InvalidStatus { action: "Join" });
        assert_eq!(h.session.participants.len(), 2);
    }

    #[test]
    fn same_participant_cannot_join_twice() {
        let mut h = TestHarness::new();
        h.join(0).join(0);
        assert!(matches!(h.last_result, Err(SessionError::AlreadyParticipating(_))));
        assert_eq!(h.session.participants.len(), 1);
    }
}

mod submit {
    use super::*;

    #[test]
    fn matching_words_win_with_empty_history() {
        let mut h = TestHarness::paired();
        h.submit(0, "apple").check_ok().check_status(SessionStatus::RoundInProgress);
        assert_eq!(h.events_for(1), vec![SessionEvent::OpponentSubmitted]);

        h.submit(1, "apple")
            .check_ok()
            .check_status(SessionStatus::Finished)
            .check_cancels(1)
            .check_closed(SessionOutcome::Won);

        let win = SessionEvent::Win {
            word: "apple".to_string(),
            history: vec![],
        };
        assert_eq!(h.events_for(0), vec![win.clone()]);
        assert_eq!(h.events_for(1), vec![win]);
        assert_eq!(h.session.deadline, None);
    }

    #[test]
    fn comparison_ignores_case_and_surrounding_space() {
        let mut h = TestHarness::paired();
        h.submit(0, "  Apple ").submit(1, "aPPLE");
        h.check_ok().check_closed(SessionOutcome::Won);
    }

    #[test]
    fn mismatch_advances_round() {
        let mut h = TestHarness::paired();
        h.submit(0, "apple").submit(1, "banana").check_ok().check_cancels(1).check_round(2);
        h.check_status(SessionStatus::RoundInProgress);

        assert_eq!(h.session.history.len(), 1);
        assert_eq!(h.session.history[0].round, 1);
        assert!(h.session.submissions.is_empty());
        assert_eq!(h.session.deadline, Some(TimerId(2)));

        let events = h.events_for(0);
        let SessionEvent::RoundMismatch { round, a, b } = &events[0] else {
            panic!("expected mismatch first, got {:?}", events);
        };
        assert_eq!(*round, 1);
        assert_eq!((a.nickname.as_str(), a.word.as_str()), ("A", "apple"));
        assert_eq!((b.nickname.as_str(), b.word.as_str()), ("B", "banana"));
        assert!(matches!(events[1], SessionEvent::RoundStart { round: 2, .. }));
    }

    #[test]
    fn win_reports_prior_mismatches() {
        let mut h = TestHarness::paired();
        h.submit(0, "apple").submit(1, "banana");
        h.submit(0, "cherry").submit(1, "date");
        h.submit(0, "fig").submit(1, "FIG").check_closed(SessionOutcome::Won);

        let SessionEvent::Win { history, .. } = &h.events_for(0)[0] else {
            panic!("expected win");
        };
        let rounds: Vec<u32> = history.iter().map(|r| r.round).collect();
        assert_eq!(rounds, vec![1, 2]);
    }

    #[test]
    fn resubmission_overwrites() {
        let mut h = TestHarness::paired();
        h.submit(0, "apple").submit(0, " pear ").check_ok();
        assert_eq!(h.session.submission(h.id(0)), Some("pear"));
        h.submit(1, "pear").check_closed(SessionOutcome::Won);
    }

    #[test]
    fn rejected_before_pairing() {
        let mut h = TestHarness::new();
        h.join(0)
            .submit(0, "apple")
            .check_outcome(ExpectedOutcome::InvalidStatus { action: "Submit" });
    }

    #[test]
    fn rejected_from_outsider() {
        let mut h = TestHarness::paired();
        h.apply(SessionAction::Submit {
            participant_id: ParticipantId::new(),
            word: "apple".to_string(),
        })
        .check_outcome(ExpectedOutcome::UnknownParticipant);
        assert!(h.session.submissions.is_empty());
    }

    #[test]
    fn rejected_after_finish() {
        let mut h = TestHarness::paired();
        h.submit(0, "x").submit(1, "x");
        h.submit(0, "y")
            .check_outcome(ExpectedOutcome::InvalidStatus { action: "Submit" });
    }
}

mod deadline {
    use super::*;

    #[test]
    fn times_out_with_partial_submission() {
        let mut h = TestHarness::paired();
        h.submit(0, "apple");
        h.deadline()
            .check_ok()
            .check_status(SessionStatus::Finished)
            .check_closed(SessionOutcome::TimedOut);
        assert_eq!(h.events_for(0), vec![SessionEvent::Timeout]);
        assert_eq!(h.events_for(1), vec![SessionEvent::Timeout]);
        assert_eq!(h.session.deadline, None);
    }

    #[test]
    fn stale_timer_is_ignored() {
        let mut h = TestHarness::paired();
        h.submit(0, "apple").submit(1, "banana");
        h.apply(SessionAction::DeadlineElapsed(TimerId(1)))
            .check_outcome(ExpectedOutcome::StaleDeadline)
            .check_status(SessionStatus::RoundInProgress);
    }

    #[test]
    fn fires_nothing_after_win() {
        let mut h = TestHarness::paired();
        h.submit(0, "apple").submit(1, "apple");
        h.apply(SessionAction::DeadlineElapsed(TimerId(1)))
            .check_outcome(ExpectedOutcome::InvalidStatus {
                action: "DeadlineElapsed",
            });
    }
}

mod disconnect {
    use super::*;

    #[test]
    fn during_round_notifies_remaining_and_cancels() {
        let mut h = TestHarness::paired();
        h.disconnect(1)
            .check_ok()
            .check_cancels(1)
            .check_status(SessionStatus::Finished)
            .check_closed(SessionOutcome::Abandoned);
        assert_eq!(h.events_for(0), vec![SessionEvent::OpponentLeft]);
        assert!(h.events_for(1).is_empty());
        assert_eq!(h.session.deadline, None);
    }

    #[test]
    fn while_awaiting_opponent_closes_quietly() {
        let mut h = TestHarness::new();
        h.join(0).disconnect(0).check_ok().check_closed(SessionOutcome::Abandoned);
        assert_eq!(h.effects(), &[SessionEffect::Close(SessionOutcome::Abandoned)]);
    }

    #[test]
    fn unknown_participant() {
        let mut h = TestHarness::paired();
        h.apply(SessionAction::Disconnect(ParticipantId::new()))
            .check_outcome(ExpectedOutcome::UnknownParticipant)
            .check_status(SessionStatus::RoundInProgress);
    }
}

#[test]
fn events_serialize_with_type_tag() {
    let json = serde_json::to_value(SessionEvent::RoundStart {
        round: 2,
        opponent_nickname: "B".to_string(),
        deadline_secs: 15,
    })
    .unwrap();
    assert_eq!(json["type"], "round_start");
    assert_eq!(json["round"], 2);
    assert_eq!(json["opponent_nickname"], "B");

    let json = serde_json::to_value(SessionEvent::OpponentLeft).unwrap();
    assert_eq!(json, serde_json::json!({ "type": "opponent_left" }));
}

#[test]
fn mismatch_payload_carries_only_nickname_and_word() {
    let mut h = TestHarness::paired();
    h.submit(0, "apple").submit(1, "banana");

    let mismatch = h.events_for(0).remove(0);
    let json = serde_json::to_value(&mismatch).unwrap();
    assert_eq!(json["a"], serde_json::json!({ "nickname": "A", "word": "apple" }));
    assert_eq!(json["b"], serde_json::json!({ "nickname": "B", "word": "banana" }));

    h.submit(0, "fig").submit(1, "fig");
    let win = serde_json::to_value(&h.events_for(1)[0]).unwrap();
    assert_eq!(
        win["history"][0]["words"],
        serde_json::json!([
            { "nickname": "A", "word": "apple" },
            { "nickname": "B", "word": "banana" },
        ])
    );
}
