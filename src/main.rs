/// Entry point and game loop.

mod config;
mod domain;
mod logging;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{error, info, warn};

use config::GameConfig;
use sim::event::GameEvent;
use sim::game::Phase;
use sim::ranking::{RankingError, RankingStore};
use sim::selection::SelectionMode;
use sim::world::{Screen, WorldState};
use ui::input::{InputState, Pointer};
use ui::renderer::{grid_cell_at, Renderer};
use ui::sound::SoundEngine;

/// Message bar durations, in frames.
const MSG_SHORT: u32 = 60;
const MSG_LONG: u32 = 180;

fn main() {
    let log_path = logging::init(&config::data_dir());
    let config = GameConfig::load();
    let store = RankingStore::open_default();
    info!("ranking file: {}", store.path().display());

    let mut world = WorldState::new(&config);
    world.set_ranking(&store.load_ranking());

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut world, &mut renderer, sound.as_ref(), &store, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        error!("game loop: {e}");
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Word Hunt!");
    if let Some(path) = log_path {
        println!("Log: {}", path.display());
    }
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    store: &RankingStore,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut input = InputState::new();
    let frame = Duration::from_millis(config.timer.frame_ms);
    let mut last = Instant::now();

    loop {
        input.drain_events();

        if input.ctrl_c_pressed() {
            break;
        }
        if input.resized {
            renderer.invalidate();
        }
        if handle_keys(world, sound, store, &input) {
            break;
        }
        handle_pointer(world, sound, &input);

        // Countdown runs on wall-clock time, independent of frame rate.
        let now = Instant::now();
        let events = world.game.advance_time(now - last);
        last = now;
        process_events(world, sound, &events);

        world.anim_tick = world.anim_tick.wrapping_add(1);
        world.tick_message();

        renderer.render(world)?;
        std::thread::sleep(frame);
    }

    Ok(())
}

// ── Events → sound + message bar ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum MusicCue {
    Start,
    Stop,
}

/// The loop plays while a level's clock runs and stops when it ends.
fn music_cue(event: &GameEvent) -> Option<MusicCue> {
    match event {
        GameEvent::LevelStarted { .. } => Some(MusicCue::Start),
        GameEvent::LevelCleared { .. } | GameEvent::AllCleared { .. } | GameEvent::TimedOut { .. } => {
            Some(MusicCue::Stop)
        }
        _ => None,
    }
}

fn process_events(world: &mut WorldState, sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = if world.muted { None } else { sound };
    let run_over = events.iter().any(|e| matches!(e, GameEvent::AllCleared { .. }));

    for event in events {
        if let Some(s) = sound {
            match music_cue(event) {
                Some(MusicCue::Start) => s.start_music(world.muted),
                Some(MusicCue::Stop) => s.stop_music(),
                None => {}
            }
        }
        match event {
            GameEvent::LevelStarted { key, index } => {
                if let Some(s) = sfx { s.play_start(); }
                world.set_message(&format!("Level {}: {}", index + 1, key.to_uppercase()), MSG_SHORT);
            }
            GameEvent::WordFound { word, score_delta } => {
                if let Some(s) = sfx { s.play_found(); }
                world.set_message(&format!("{word}  +{score_delta}"), MSG_SHORT);
            }
            GameEvent::AlreadyFound { word } => {
                if let Some(s) = sfx { s.play_miss(); }
                world.set_message(&format!("{word} was already found"), MSG_SHORT);
            }
            GameEvent::NoMatch => {
                if let Some(s) = sfx { s.play_miss(); }
            }
            GameEvent::LevelCleared { key } => {
                if run_over {
                    continue;
                }
                if let Some(s) = sfx { s.play_clear(); }
                world.set_message(&format!("Level {} cleared!", key.to_uppercase()), MSG_LONG);
            }
            GameEvent::AllCleared { score } => {
                if let Some(s) = sfx { s.play_all_clear(); }
                world.set_message(&format!("Every level cleared! Final score {score}"), MSG_LONG);
            }
            GameEvent::TimedOut { score } => {
                if let Some(s) = sfx { s.play_timed_out(); }
                world.set_message(&format!("Time's up! Final score {score}"), MSG_LONG);
            }
        }
    }
}

// ── Key Constants ──

const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_BACK: &[KeyCode] = &[KeyCode::Esc, KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Esc, KeyCode::F(2)];
const KEYS_MODE: &[KeyCode] = &[KeyCode::Tab];
const KEYS_MUTE: &[KeyCode] = &[KeyCode::Char('m'), KeyCode::Char('M')];

fn is(key: &KeyEvent, codes: &[KeyCode]) -> bool {
    codes.contains(&key.code)
}

/// Returns true when the player asked to quit.
fn handle_keys(
    world: &mut WorldState,
    sound: Option<&SoundEngine>,
    store: &RankingStore,
    input: &InputState,
) -> bool {
    for key in &input.keys {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            continue;
        }
        let quit = match world.screen {
            Screen::Title => handle_title_key(world, sound, store, key),
            Screen::Instructions | Screen::Ranking => {
                if is(key, KEYS_BACK) {
                    world.screen = Screen::Title;
                }
                false
            }
            Screen::Playing => {
                handle_game_key(world, sound, store, key);
                false
            }
        };
        if quit {
            return true;
        }
    }
    false
}

fn handle_title_key(
    world: &mut WorldState,
    sound: Option<&SoundEngine>,
    store: &RankingStore,
    key: &KeyEvent,
) -> bool {
    match key.code {
        KeyCode::Up => world.move_cursor(-1),
        KeyCode::Down => world.move_cursor(1),
        KeyCode::Enter | KeyCode::Char(' ') => start_selected(world, sound),
        KeyCode::Tab => toggle_mode(world),
        KeyCode::Char('m') | KeyCode::Char('M') => toggle_mute(world, sound),
        KeyCode::Char('i') | KeyCode::Char('I') => world.screen = Screen::Instructions,
        KeyCode::Char('r') | KeyCode::Char('R') => open_ranking(world, store),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return true,
        _ => {}
    }
    false
}

fn handle_game_key(
    world: &mut WorldState,
    sound: Option<&SoundEngine>,
    store: &RankingStore,
    key: &KeyEvent,
) {
    match world.game.phase() {
        Phase::Playing => {
            if key.code == KeyCode::Esc && has_anchor(world) {
                world.game.cancel_selection();
            } else if is(key, KEYS_RESTART) {
                return_to_title(world, sound, "Game reset");
            } else if is(key, KEYS_MODE) {
                toggle_mode(world);
            } else if is(key, KEYS_MUTE) {
                toggle_mute(world, sound);
            }
        }
        Phase::LevelCleared => {
            if is(key, KEYS_CONFIRM) {
                match world.game.advance() {
                    Ok(events) => {
                        world.hover = None;
                        process_events(world, sound, &events);
                    }
                    Err(e) => {
                        error!("advance failed: {e}");
                        world.set_message(&format!("Cannot continue: {e}"), MSG_LONG);
                    }
                }
            } else if is(key, KEYS_RESTART) {
                return_to_title(world, sound, "Game reset");
            } else if is(key, KEYS_MUTE) {
                toggle_mute(world, sound);
            }
        }
        Phase::TimedOut | Phase::AllCleared => handle_name_entry(world, sound, store, key),
        Phase::Idle => world.screen = Screen::Title,
    }
}

/// Name entry on the end-of-run panel. Runs without a score skip straight
/// back to the title.
fn handle_name_entry(
    world: &mut WorldState,
    sound: Option<&SoundEngine>,
    store: &RankingStore,
    key: &KeyEvent,
) {
    let score = world.game.final_score().unwrap_or(0);
    if is(key, KEYS_RESTART) {
        return_to_title(world, sound, "");
        return;
    }
    if score == 0 {
        if is(key, KEYS_CONFIRM) {
            return_to_title(world, sound, "");
        }
        return;
    }
    match key.code {
        KeyCode::Enter => submit_score(world, store, score),
        KeyCode::Backspace => world.pop_name_char(),
        KeyCode::Char(c) => world.push_name_char(c),
        _ => {}
    }
}

fn submit_score(world: &mut WorldState, store: &RankingStore, score: u32) {
    match store.submit(&world.name_input, score) {
        Ok(entry) => {
            world.game.restart();
            world.reset_run();
            world.set_ranking(&store.load_ranking());
            world.screen = Screen::Ranking;
            world.set_message(&format!("Saved {} with {} points", entry.name, entry.score), MSG_LONG);
        }
        Err(e @ (RankingError::Io(_) | RankingError::Json(_))) => {
            warn!("could not save score: {e}");
            world.set_message(&format!("Could not save score: {e}"), MSG_LONG);
        }
        Err(e) => world.set_message(&capitalize(&e.to_string()), MSG_LONG),
    }
}

// ── Pointer ──

fn handle_pointer(world: &mut WorldState, sound: Option<&SoundEngine>, input: &InputState) {
    if world.screen != Screen::Playing {
        return;
    }
    let size = match world.game.session() {
        Some(s) => s.grid().size(),
        None => return,
    };

    for p in &input.pointer {
        match *p {
            Pointer::Down { x, y } => {
                if let Some(at) = grid_cell_at(x, y, size) {
                    let events = world.game.on_anchor(at);
                    process_events(world, sound, &events);
                }
            }
            Pointer::Drag { x, y } | Pointer::Move { x, y } => {
                world.hover = grid_cell_at(x, y, size);
                if let Some(at) = world.hover {
                    world.game.on_extend(at);
                }
            }
            Pointer::Up { x, y } => match grid_cell_at(x, y, size) {
                Some(at) => {
                    let events = world.game.on_commit(at);
                    process_events(world, sound, &events);
                }
                None if world.game.mode() == SelectionMode::Drag => world.game.cancel_selection(),
                None => {}
            },
        }
    }
}

// ── Helpers ──

fn start_selected(world: &mut WorldState, sound: Option<&SoundEngine>) {
    let key = match world.selected_level_key() {
        Some(k) => k,
        None => {
            world.set_message("No levels available", MSG_LONG);
            return;
        }
    };
    match world.game.start(&key) {
        Ok(events) => {
            world.reset_run();
            world.screen = Screen::Playing;
            process_events(world, sound, &events);
        }
        Err(e) => {
            error!("start failed: {e}");
            world.set_message(&format!("Cannot start level: {e}"), MSG_LONG);
        }
    }
}

/// Drop the session, its timer and the music, then show the title screen.
fn return_to_title(world: &mut WorldState, sound: Option<&SoundEngine>, msg: &str) {
    if let Some(s) = sound {
        s.stop_music();
    }
    world.game.restart();
    world.reset_run();
    world.screen = Screen::Title;
    if msg.is_empty() {
        world.message.clear();
        world.message_timer = 0;
    } else {
        world.set_message(msg, MSG_SHORT);
    }
}

fn toggle_mode(world: &mut WorldState) {
    let mode = world.game.mode().toggled();
    world.game.set_mode(mode);
    world.set_message(&format!("Selection mode: {}", mode.label()), MSG_SHORT);
}

fn toggle_mute(world: &mut WorldState, sound: Option<&SoundEngine>) {
    world.muted = !world.muted;
    if let Some(s) = sound {
        s.set_music_paused(world.muted);
    }
    world.set_message(if world.muted { "Sound off" } else { "Sound on" }, MSG_SHORT);
}

fn open_ranking(world: &mut WorldState, store: &RankingStore) {
    world.set_ranking(&store.load_ranking());
    world.screen = Screen::Ranking;
}

fn has_anchor(world: &WorldState) -> bool {
    world
        .game
        .session()
        .map_or(false, |s| s.selection().anchor().is_some())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
