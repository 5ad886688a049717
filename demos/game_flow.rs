//! Game Flow
//!
//! This example drives the screen flow of a small arcade game from a fixed
//! update loop.
//!
//! Key concepts:
//! - Predicate transitions wired once, re-evaluated every tick
//! - An any-state transition for "game lost" that pre-empts everything
//! - Challenge and pause screens left through history ("back")
//! - Checkpointing the flow to JSON
//!
//! Run with: cargo run --example game_flow
//! Set RUST_LOG=statehop=debug to see every switch.

use statehop::builder::StateMachineBuilder;
use statehop::checkpoint::CheckpointError;
use statehop::core::{Guard, StackHistory, State};
use statehop::fsm::TransitionData;
use statehop::state_enum;
use std::cell::Cell;
use std::rc::Rc;

state_enum! {
    enum GameState {
        Menu,
        Playing,
        Paused,
        Restart,
        Challenge,
    }
}

/// Input flags a real game would set from its input handlers.
#[derive(Default)]
struct Input {
    start: Cell<bool>,
    pause: Cell<bool>,
    lost: Cell<bool>,
    challenge: Cell<bool>,
}

impl Input {
    fn clear(&self) {
        self.start.set(false);
        self.pause.set(false);
        self.lost.set(false);
        self.challenge.set(false);
    }
}

/// Guard that reads one input flag every tick.
fn on(input: &Rc<Input>, read: fn(&Input) -> bool) -> Guard {
    let input = Rc::clone(input);
    Guard::new(move || read(&input))
}

struct Screen {
    id: GameState,
}

impl State<GameState, u32> for Screen {
    fn id(&self) -> GameState {
        self.id
    }

    fn enter_state(&mut self, data: &TransitionData<GameState, u32>) {
        match data.payload {
            Some(score) => println!("  -> {:?} (score {})", self.id, score),
            None => println!("  -> {:?}", self.id),
        }
    }

    fn exit_state(&mut self, _data: &TransitionData<GameState, u32>) {
        println!("  <- {:?}", self.id);
    }
}

struct Playing {
    elapsed: f32,
    score: Rc<Cell<u32>>,
}

impl State<GameState, u32> for Playing {
    fn id(&self) -> GameState {
        GameState::Playing
    }

    fn enter_state(&mut self, data: &TransitionData<GameState, u32>) {
        println!("  -> Playing ({:?})", data.trigger);
    }

    fn update(&mut self, delta_time: f32) {
        self.elapsed += delta_time;
        self.score.set(self.score.get() + 1);
    }
}

fn main() -> Result<(), CheckpointError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "statehop=info".to_string()),
        )
        .init();

    println!("=== Game Flow Example ===\n");

    let input = Rc::new(Input::default());
    let score = Rc::new(Cell::new(0));

    let mut machine = StateMachineBuilder::<GameState, u32>::new()
        .with_initial_state(Screen { id: GameState::Menu }, true, None)
        .with_state(Playing {
            elapsed: 0.0,
            score: Rc::clone(&score),
        })
        .with_state(Screen {
            id: GameState::Paused,
        })
        .with_state(Screen {
            id: GameState::Restart,
        })
        .with_state(Screen {
            id: GameState::Challenge,
        })
        .with_transition(
            GameState::Menu,
            GameState::Playing,
            on(&input, |i| i.start.get()),
        )
        .with_transition(
            GameState::Menu,
            GameState::Challenge,
            on(&input, |i| i.challenge.get()),
        )
        .with_transition(
            GameState::Playing,
            GameState::Paused,
            on(&input, |i| i.pause.get()),
        )
        .with_transition(
            GameState::Restart,
            GameState::Playing,
            on(&input, |i| i.start.get()),
        )
        .with_any_transition(GameState::Restart, on(&input, |i| i.lost.get()))
        .with_history_strategy(StackHistory::with_capacity(32))
        .build();

    let script: [(&str, fn(&Input)); 8] = [
        ("open challenge", |i| i.challenge.set(true)),
        ("back", |_| {}),
        ("press start", |i| i.start.set(true)),
        ("play", |_| {}),
        ("press pause", |i| i.pause.set(true)),
        ("back", |_| {}),
        ("lose the ball", |i| i.lost.set(true)),
        ("press start", |i| i.start.set(true)),
    ];

    for (frame, (label, action)) in script.iter().enumerate() {
        println!("frame {}: {}", frame, label);
        action(&input);

        if *label == "back" {
            let outcome = machine.restore_state();
            println!("  restore: {:?}", outcome);
        } else {
            machine.update(1.0 / 60.0);
        }

        input.clear();
    }

    println!("\nFinal state: {:?}", machine.current_state_type());
    println!("Ticks played: {}", score.get());

    machine.set_to_state(GameState::Menu, Some(score.get()));

    let checkpoint = machine.checkpoint();
    println!("\nCheckpoint:\n{}", checkpoint.to_json()?);

    println!("\n=== Example Complete ===");
    Ok(())
}
