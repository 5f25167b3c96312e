//! The demo story shipped with the binary.

use serde::{Deserialize, Serialize};
use tbd_core::{
    ArgKind, Button, EngineResult, ParamSpec, PassageArgs, PassageRegistry, Scene, TextButton,
};

/// State of the demo story.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemoState {
    /// Times the player wandered off.
    pub hello: i64,
}

/// All passages of the demo, starting with `intro`.
pub fn registry() -> PassageRegistry<DemoState> {
    let msg = || vec![ParamSpec::required("msg", ArgKind::Text)];
    PassageRegistry::new()
        .with("intro", vec![], intro)
        .with("wander", vec![], wander)
        .with("message", msg(), message)
        .with("display", msg(), display)
        .with_start("intro")
}

fn intro(scene: &mut Scene<'_, DemoState>, _args: &PassageArgs) -> EngineResult<()> {
    let hello = scene.state().hello;
    scene.paragraph("<h1>Hello</h1>The road winds away from the inn.");
    scene.paragraph(format!("Hello worlds: <b>{hello}</b>"));
    scene.continuations([Button::goto("Click", "message").with_arg("msg", "Youpi")]);
    Ok(())
}

fn wander(scene: &mut Scene<'_, DemoState>, _args: &PassageArgs) -> EngineResult<()> {
    scene.state_mut().hello += 1;
    scene.paragraph(
        "You follow the road past hedges and a ruined mill. Crows argue on the \
         fence posts and the wind smells of rain.",
    );
    scene.paragraph("Somewhere ahead a bell rings twice, then falls silent.");
    scene.continuations([
        Button::goto("Click", "message").with_arg("msg", "Tralala"),
        Button::goto("Clack", "wander"),
    ]);
    Ok(())
}

fn message(scene: &mut Scene<'_, DemoState>, args: &PassageArgs) -> EngineResult<()> {
    let hello = scene.state().hello;
    let msg = args.get_str("msg").unwrap_or_default();
    scene.paragraph(format!("Hi: <b>{hello}</b>"));
    scene.paragraph("A courier waits by the milestone, holding a folded note.");
    let note = scene.paragraph(format!("This is a message: <i>{msg}</i>"));
    scene.paragraph_in(note, "The seal is already broken.");
    scene.continuations([
        tbd_core::Continuation::from(Button::goto("Clack", "wander")),
        TextButton::new("Display", "display", "msg").into(),
    ]);
    Ok(())
}

fn display(scene: &mut Scene<'_, DemoState>, args: &PassageArgs) -> EngineResult<()> {
    let msg = args.get_str("msg").unwrap_or_default();
    scene.paragraph(format!("The courier reads your reply aloud: <i>{msg}</i>"));
    scene.continuations([Button::goto("Click", "message").with_arg("msg", "hello world")]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tbd_core::{ElementAddress, EngineConfig, Game, MemoryStorage, MemorySurface, Outcome};

    type DemoGame = Game<DemoState, MemorySurface, MemoryStorage>;

    fn launch() -> DemoGame {
        Game::launch(
            registry(),
            EngineConfig::default(),
            MemorySurface::new(),
            MemoryStorage::new(),
        )
        .unwrap()
    }

    fn press(game: &mut DemoGame, index: usize) -> Outcome {
        let buttons = game.surface().live_buttons(game.active_root());
        game.activate(&buttons[index]).unwrap()
    }

    fn output() -> ElementAddress {
        ElementAddress::fixed("output")
    }

    #[test]
    fn intro_leads_to_message() {
        let mut game = launch();
        assert!(game.surface().text(&output()).contains("Hello worlds: 0"));

        assert_eq!(press(&mut game, 0), Outcome::Advanced);
        let text = game.surface().text(&output());
        assert!(text.contains("This is a message: Youpi"));
        assert!(text.contains("The seal is already broken."));
    }

    #[test]
    fn wandering_counts() {
        let mut game = launch();
        press(&mut game, 0);
        press(&mut game, 0);
        press(&mut game, 1);
        assert_eq!(game.state().hello, 2);
    }

    #[test]
    fn display_echoes_typed_text() {
        let mut game = launch();
        press(&mut game, 0);

        let input = game
            .surface()
            .descendants(&output())
            .into_iter()
            .rev()
            .find(|id| id.as_str().contains("textinput"))
            .cloned()
            .unwrap();
        game.surface_mut().set_value(&input, "see you at dawn");
        press(&mut game, 1);

        assert!(game
            .surface()
            .text(&output())
            .contains("reads your reply aloud: see you at dawn"));
    }
}
