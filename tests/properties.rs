use std::collections::HashSet;

use language_match::{
    Card, CardFace, CardId, GameConfig, GameController, GamePhase, Language, RuleEngine,
    ScheduledTask, Sinks, Vocabulary, WordPair,
};
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[derive(Debug, Clone)]
enum Op {
    Flip(CardId),
    Fire(usize),
    Restart,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0u32..18).prop_map(Op::Flip),
        4 => any::<usize>().prop_map(Op::Fire),
        1 => Just(Op::Restart),
    ]
}

fn vocabulary() -> Vocabulary {
    let pairs = (0..10)
        .map(|i| WordPair::new(format!("palabra{i}"), format!("word{i}")))
        .collect();
    Vocabulary::new("spanish", "english", pairs).expect("vocabulary")
}

fn language() -> impl Strategy<Value = Language> {
    prop_oneof![Just(Language::Source), Just(Language::Target)]
}

proptest! {
    #[test]
    fn session_invariants_hold_under_any_input(
        seed in any::<u64>(),
        time_limit in 1u32..20,
        ops in prop::collection::vec(op_strategy(), 0..250),
    ) {
        let config = GameConfig { time_limit_secs: time_limit, ..GameConfig::default() };
        let mut controller = GameController::new(
            config.clone(),
            vocabulary(),
            SmallRng::seed_from_u64(seed),
            Sinks::noop(),
        )
        .expect("controller");
        let mut pending: Vec<ScheduledTask> = controller.drain_tasks();
        let mut matched: HashSet<CardId> = HashSet::new();
        let mut session_id = controller.session().id;
        let mut last_matches = 0;

        for op in ops {
            match op {
                Op::Flip(card_id) => {
                    let before = controller.session().clone();
                    if controller.on_card_clicked(card_id).is_err() {
                        prop_assert_eq!(controller.session(), &before);
                    }
                }
                Op::Fire(index) => {
                    if !pending.is_empty() {
                        let task = pending.remove(index % pending.len());
                        controller.fire(task);
                    }
                }
                Op::Restart => {
                    controller.on_restart_requested().expect("restart");
                }
            }
            pending.extend(controller.drain_tasks());

            let session = controller.session();
            if session.id != session_id {
                session_id = session.id;
                matched.clear();
                last_matches = 0;
                prop_assert_eq!(session.score, config.initial_score);
                prop_assert_eq!(session.seconds_remaining, config.time_limit_secs);
            }

            prop_assert!(session.flipped_unresolved.len() <= 2);
            prop_assert!(session.integrity_check().is_ok());

            for id in &matched {
                let card = session.card(*id).expect("matched card still exists");
                prop_assert!(card.matched);
                prop_assert_eq!(card.face, CardFace::FaceUp);
            }
            matched.extend(session.cards.iter().filter(|card| card.matched).map(|card| card.id));

            prop_assert!(session.matches_found >= last_matches);
            prop_assert!(session.matches_found <= last_matches + 1);
            prop_assert!(session.matches_found as usize <= session.pair_count());
            last_matches = session.matches_found;

            if session.matches_found as usize == session.pair_count() {
                prop_assert_eq!(session.phase, GamePhase::Won);
            }
            if session.score == 0 || session.seconds_remaining == 0 {
                prop_assert_eq!(session.phase, GamePhase::Lost);
            }
        }
    }

    #[test]
    fn match_predicate_is_symmetric(
        a_lang in language(),
        b_lang in language(),
        a_word in 0usize..4,
        b_word in 0usize..4,
    ) {
        let words = ["uno", "dos", "one", "two"];
        let pairs = vec![WordPair::new("uno", "one"), WordPair::new("dos", "two")];
        let a = Card::new(0, words[a_word], a_lang);
        let b = Card::new(1, words[b_word], b_lang);

        prop_assert_eq!(
            RuleEngine::is_match(&pairs, &a, &b),
            RuleEngine::is_match(&pairs, &b, &a)
        );
        if a_lang == b_lang {
            prop_assert!(!RuleEngine::is_match(&pairs, &a, &b));
        }
    }
}

#[test]
fn identical_content_same_language_never_matches() {
    let pairs = vec![WordPair::new("sol", "sol")];
    let a = Card::new(0, "sol", Language::Target);
    let b = Card::new(1, "sol", Language::Target);
    assert!(!RuleEngine::is_match(&pairs, &a, &b));

    let source = Card::new(2, "sol", Language::Source);
    assert!(RuleEngine::is_match(&pairs, &source, &b));
}
