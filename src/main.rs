// Interactive console: this binary talks to the user on stdout.
#![allow(clippy::print_stdout)]

use std::io::{self, BufRead, Write};
use std::path::Path;

use biolens::interpreter::GeminiClient;
use biolens::scene::{ComponentKind, MemoryEngine};
use biolens::session::Session;
use biolens::source;
use biolens::state::{ColorMode, ReprStyle, StateUpdate, Tint, ViewState};
use serde::de::DeserializeOwned;

const HELP: &str = "\
Commands:
  load <id|path>     load a structure (RCSB id or local .pdb/.cif/.bcif)
  style <name>       cartoon | surface | ball-and-stick | spacefill |
                     putty | wireframe
  color <mode>       chain-id | element-symbol | residue-name |
                     hydrophobicity | uniform
  tint <#rrggbb>     uniform tint color
  water on|off       toggle solvent water
  hetero on|off      toggle hetero atoms
  state              show the current view state
  scene              show what the engine scene contains
  quit               exit
Anything else is sent to the language service (needs GEMINI_API_KEY).";

fn main() {
    env_logger::init();

    let mut engine = MemoryEngine::new();
    let mut session = Session::new();
    let service =
        std::env::var("GEMINI_API_KEY").ok().map(GeminiClient::new);

    if let Some(arg) = std::env::args().nth(1) {
        load(&mut session, &mut engine, &arg);
    }

    println!("biolens console — 'help' lists commands");
    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        match word {
            "quit" | "exit" => break,
            "help" => println!("{HELP}"),
            "load" => load(&mut session, &mut engine, rest),
            "state" => print_state(session.state()),
            "scene" => print_scene(&engine),
            "style" => match parse_word::<ReprStyle>(rest) {
                Some(style) => apply(
                    &mut session,
                    &mut engine,
                    StateUpdate { style: Some(style), ..Default::default() },
                ),
                None => println!("unknown style: {rest}"),
            },
            "color" => match parse_word::<ColorMode>(rest) {
                Some(mode) => apply(
                    &mut session,
                    &mut engine,
                    StateUpdate {
                        color_mode: Some(mode),
                        ..Default::default()
                    },
                ),
                None => println!("unknown color mode: {rest}"),
            },
            "tint" => match rest.parse::<Tint>() {
                Ok(tint) => apply(
                    &mut session,
                    &mut engine,
                    StateUpdate { tint: Some(tint), ..Default::default() },
                ),
                Err(e) => println!("{e}"),
            },
            "water" | "hetero" => match toggle(rest) {
                Some(on) => {
                    let update = if word == "water" {
                        StateUpdate {
                            show_water: Some(on),
                            ..Default::default()
                        }
                    } else {
                        StateUpdate {
                            show_hetero: Some(on),
                            ..Default::default()
                        }
                    };
                    apply(&mut session, &mut engine, update);
                }
                None => println!("expected on/off, got {rest:?}"),
            },
            _ => chat(&mut session, &mut engine, service.as_ref(), line),
        }
    }
}

fn load(session: &mut Session, engine: &mut MemoryEngine, input: &str) {
    if input.is_empty() {
        println!("usage: load <id|path>");
        return;
    }
    let data = if Path::new(input).exists() {
        source::read_file(Path::new(input))
    } else {
        source::fetch(input)
    };
    match data {
        Ok(data) => match session.load(engine, &data) {
            Ok(()) => println!("loaded {}", data.label),
            Err(e) => println!("{e}"),
        },
        Err(e) => println!("{e}"),
    }
}

fn apply(
    session: &mut Session,
    engine: &mut MemoryEngine,
    update: StateUpdate,
) {
    match session.apply(engine, &update) {
        Ok(()) => print_state(session.state()),
        Err(e) => println!("{e}"),
    }
}

fn chat(
    session: &mut Session,
    engine: &mut MemoryEngine,
    service: Option<&GeminiClient>,
    input: &str,
) {
    let Some(service) = service else {
        println!("set GEMINI_API_KEY to enable free-text commands");
        return;
    };
    match session.command(engine, service, input) {
        Ok(message) => println!("{message}"),
        Err(e) => println!("{e}"),
    }
}

fn print_state(state: &ViewState) {
    println!(
        "structure: {}",
        state.structure_id.as_deref().unwrap_or("none")
    );
    println!("style:     {}", state.style.as_str());
    println!("color:     {}", state.color_mode.as_str());
    println!("tint:      {}", state.tint);
    println!("water:     {}", state.show_water);
    println!("hetero:    {}", state.show_hetero);
}

fn print_scene(engine: &MemoryEngine) {
    if engine.scene().is_empty() {
        println!("(empty scene)");
        return;
    }
    for comp in engine.scene() {
        let kind = match comp.kind {
            ComponentKind::Polymer => "polymer",
            ComponentKind::Ligand => "ligand",
            ComponentKind::Water => "water",
        };
        for repr in &comp.representations {
            println!(
                "{kind}: {} ({:?}, alpha {})",
                repr.style.as_str(),
                repr.color,
                repr.params.alpha
            );
        }
    }
}

fn parse_word<T: DeserializeOwned>(s: &str) -> Option<T> {
    serde_json::from_value(serde_json::Value::String(s.to_owned())).ok()
}

fn toggle(s: &str) -> Option<bool> {
    match s {
        "on" | "true" => Some(true),
        "off" | "false" => Some(false),
        _ => None,
    }
}
