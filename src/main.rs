//! Doomtown Reloaded rules engine - demo binary
//!
//! Plays a short scripted round with the sample cards: a noon action, a
//! reaction when shootout plays open, a forced trigger on revealed draw
//! hands and a cheatin' resolution play.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dtr_engine::{
    catalog,
    core::PlayerId,
    game::{
        DecisionMaker, Engine, EventData, GameState, OutputFormat, Phase, PlayWindow,
        RandomController, ScriptedController, Shootout, VerbosityLevel, ZeroController,
    },
    zones::Location,
};

/// Controller type for both players
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ControllerType {
    /// Always picks the first button
    Zero,
    /// Picks uniformly at random (see --seed)
    Random,
    /// Follows --script, then picks the first button
    Scripted,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Parser)]
#[command(name = "dtr")]
#[command(about = "Doomtown Reloaded rules engine demo", long_about = None)]
struct Cli {
    /// Verbosity level (silent/0, minimal/1, normal/2, verbose/3)
    #[arg(long, short = 'v', default_value = "normal")]
    verbosity: VerbosityLevel,

    /// Log output format
    #[arg(long, value_enum, default_value = "text")]
    format: FormatArg,

    /// Seed for the random controller
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Decision maker used for both players
    #[arg(long, value_enum, default_value = "zero")]
    controller: ControllerType,

    /// Button indices answered in order by the scripted controller
    #[arg(long, value_delimiter = ',')]
    script: Vec<usize>,

    /// Print the menu descriptor of every action ability as JSON
    #[arg(long)]
    menu: bool,

    /// Print the final board state as JSON
    #[arg(long)]
    dump_state: bool,
}

fn make_controller(cli: &Cli, player: PlayerId, offset: u64) -> Box<dyn DecisionMaker> {
    match cli.controller {
        ControllerType::Zero => Box::new(ZeroController::new(player)),
        ControllerType::Random => Box::new(RandomController::with_seed(player, cli.seed + offset)),
        ControllerType::Scripted => Box::new(ScriptedController::new(player, cli.script.clone())),
    }
}

fn open_window(engine: &mut Engine, window: PlayWindow) -> Result<()> {
    engine.state.round.play_window = Some(window);
    engine.raise_event(EventData::PlayWindowOpened { window })?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut state = GameState::new_two_player("Alice", "Bob", 10);
    state.logger.set_verbosity(cli.verbosity);
    state.logger.set_output_format(cli.format.into());
    let alice = state.players[0].id;
    let bob = state.players[1].id;

    let mut engine = Engine::new(state);
    let allie = catalog::allie_hensman(&mut engine, alice, Location::PlayArea)?;
    let pearlys = catalog::pearlys_palace(&mut engine, alice, Location::PlayArea)?;
    let varmint = catalog::cheatin_varmint(&mut engine, alice, Location::Hand)?;
    let mortimer = catalog::mortimer_parsons(&mut engine, bob, Location::PlayArea)?;
    engine.state.cards.get_mut(allie.card)?.in_town_square = true;

    let mut alice_controller = make_controller(&cli, alice, 0);
    let mut bob_controller = make_controller(&cli, bob, 1);
    let mut controllers: [&mut dyn DecisionMaker; 2] =
        [alice_controller.as_mut(), bob_controller.as_mut()];

    engine.begin_round()?;

    // Noon
    engine.state.round.phase = Phase::HighNoon;
    open_window(&mut engine, PlayWindow::Noon)?;
    if cli.menu {
        for sample in [&allie, &pearlys, &varmint, &mortimer] {
            for &id in &sample.abilities {
                if engine.ability(id)?.is_action() {
                    let item = engine.get_menu_item(id, &id.to_string(), alice)?;
                    println!("{}", serde_json::to_string(&item)?);
                }
            }
        }
    }
    engine.execute(allie.ability(), alice)?;
    engine.run_with(&mut controllers)?;

    // Allie calls out Mortimer
    engine.state.shootout = Some(Shootout::new(allie.card, alice, mortimer.card, bob));
    open_window(&mut engine, PlayWindow::ShootoutPlays)?;
    engine.run_with(&mut controllers)?;

    // Bob's hand is illegal; Mortimer walks home before the shootout resolves
    engine.state.get_player_mut(bob)?.cheatin = true;
    engine.queue_simple_step("reveal draw hands", |engine| {
        engine.raise_event(EventData::DrawHandsRevealed { shootout: true })
    });
    let resolve = engine.queue_simple_step("resolve shootout", |engine| {
        engine.add_message("The shootout resolves", &[]);
        Ok(())
    });
    if let Some(shootout) = engine.state.shootout.as_mut() {
        shootout.pending_step = Some(resolve);
    }
    engine.continue_queue()?;
    engine.run_with(&mut controllers)?;
    engine.state.shootout = None;

    open_window(&mut engine, PlayWindow::Resolution)?;
    let cheatin_play = varmint
        .abilities
        .get(1)
        .copied()
        .context("Cheatin' Varmint has no cheatin' resolution play")?;
    engine.execute(cheatin_play, alice)?;
    engine.run_with(&mut controllers)?;

    engine.state.logger.flush_buffer();
    if cli.dump_state {
        println!("{}", serde_json::to_string_pretty(&engine.state)?);
    }
    Ok(())
}
