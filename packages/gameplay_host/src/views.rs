use game_bridge::BridgeConfig;
use game_bridge::host::NO_SAVE_SENTINEL;
use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::config::GameEntry;

fn layout(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
            }
            body class="bg-gray-900 text-gray-100" {
                (body)
            }
        }
    }
}

pub fn index_page(games: &[GameEntry]) -> Markup {
    layout(
        "Games",
        html! {
            h1 { "Games" }
            @if games.is_empty() {
                p { "No games configured. Add a [[games]] table to gameplay.toml." }
            } @else {
                ul {
                    @for game in games {
                        li {
                            a href=(format!("/game/{}", game.id)) { (game.name) }
                            " "
                            a href=(format!("/game/{}/scores", game.id)) { "(scores)" }
                        }
                    }
                }
            }
        },
    )
}

/// The host page: hidden fields and forms of the bridge contract, the game
/// iframe, and the module script that starts the bridge.
pub fn gameplay_page(game: &GameEntry, load_data: Option<&str>, bridge: &BridgeConfig) -> Markup {
    let ids = &bridge.elements;
    let action = format!("/game/{}", game.id);

    layout(
        &game.name,
        html! {
            h1 { (game.name) }

            input type="hidden" id=(ids.load_data) value=(load_data.unwrap_or(NO_SAVE_SENTINEL));

            form id=(ids.score_form) method="post" action=(action) {
                input type="hidden" id=(ids.score) name="score";
            }
            form id=(ids.save_form) method="post" action=(action) {
                input type="hidden" id=(ids.state) name="state";
            }
            form id=(ids.request_load_form) method="post" action=(action) {
                input type="hidden" id=(ids.request_load) name="request_load";
            }

            iframe id=(ids.game_iframe) src=(game.url) width="800" height="600" {}

            script type="module" {
                (PreEscaped(bootstrap_script(bridge)))
            }
        },
    )
}

pub fn not_found_page(game_id: u64) -> Markup {
    layout(
        "Not found",
        html! {
            h1 { "Game not found" }
            p { "There is no game with id " (game_id) "." }
            a href="/" { "Back to games" }
        },
    )
}

fn bootstrap_script(bridge: &BridgeConfig) -> String {
    let config = serde_json::to_string(bridge)
        .unwrap_or_else(|_| "{}".to_string())
        // Keep the JSON from closing the script element
        .replace("</", "<\\/");
    format!(
        "import init, {{ start }} from '/pkg/game_bridge_web.js';\n\
         await init();\n\
         start({});\n",
        config
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> GameEntry {
        GameEntry {
            id: 4,
            name: "Breakout".to_string(),
            url: "https://games.example/breakout/".to_string(),
        }
    }

    #[test]
    fn test_gameplay_page_renders_contract() {
        let html = gameplay_page(&game(), None, &BridgeConfig::default()).into_string();
        assert!(html.contains(r#"id="load_data" value="None""#));
        assert!(html.contains(r#"form id="score_form" method="post" action="/game/4""#));
        assert!(html.contains(r#"id="score" name="score""#));
        assert!(html.contains(r#"id="state" name="state""#));
        assert!(html.contains(r#"id="request_load" name="request_load""#));
        assert!(html.contains(r#"iframe id="game_iframe" src="https://games.example/breakout/""#));
    }

    #[test]
    fn test_gameplay_page_escapes_load_data() {
        let html = gameplay_page(&game(), Some(r#"{"level":3}"#), &BridgeConfig::default())
            .into_string();
        assert!(html.contains(r#"value="{&quot;level&quot;:3}""#));
    }

    #[test]
    fn test_gameplay_page_uses_configured_ids() {
        let mut bridge = BridgeConfig::default();
        bridge.elements.game_iframe = "frame".to_string();
        let html = gameplay_page(&game(), None, &bridge).into_string();
        assert!(html.contains(r#"iframe id="frame""#));
        assert!(html.contains(r#""game_iframe":"frame""#));
    }

    #[test]
    fn test_bootstrap_script_cannot_close_script_tag() {
        let mut bridge = BridgeConfig::default();
        bridge.elements.score = "</script><b>".to_string();
        let script = bootstrap_script(&bridge);
        assert!(!script.contains("</script>"));
        assert!(script.contains("start({"));
    }

    #[test]
    fn test_index_lists_games() {
        let html = index_page(&[game()]).into_string();
        assert!(html.contains(r#"href="/game/4""#));
        assert!(html.contains("Breakout"));
        assert!(index_page(&[]).into_string().contains("No games configured"));
    }
}
