#![cfg(target_arch = "wasm32")]

use language_match::{default_config, GameConfig, MemoryGame};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn default_config_round_trips_through_json() {
    let json = default_config().expect("default config");
    let config = GameConfig::from_json(&json).expect("config parses");
    assert_eq!(config, GameConfig::default());
}

#[wasm_bindgen_test]
fn board_starts_with_sixteen_face_down_cards() {
    let game = MemoryGame::new(None, None, None, None, None).expect("game starts");
    let snapshot: serde_json::Value =
        serde_json::from_str(&game.snapshot_json().expect("snapshot")).expect("json");
    assert_eq!(snapshot["cards"].as_array().map(Vec::len), Some(16));
    assert_eq!(snapshot["score"], 100);
    assert_eq!(snapshot["phase"], "active");
}

#[wasm_bindgen_test]
fn oversized_board_is_rejected() {
    let result = MemoryGame::new(
        Some(r#"{ "pair_count": 3 }"#.into()),
        Some(r#"[{ "source": "uno", "target": "one" }]"#.into()),
        None,
        None,
        None,
    );
    assert!(result.is_err());
}

#[wasm_bindgen_test]
fn unknown_card_click_is_rejected_not_thrown() {
    let game = MemoryGame::new(None, None, None, None, None).expect("game starts");
    assert!(!game.on_card_clicked(999).expect("call succeeds"));
}
