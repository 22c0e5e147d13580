use std::io::{self, BufRead, Write};
use std::sync::Arc;

use crossbeam_channel::Receiver;

use ghostly_chronicles::audio::director::AudioDirector;
use ghostly_chronicles::audio::AudioEngine;
use ghostly_chronicles::config::Config;
use ghostly_chronicles::game::{flow, ChoiceOutcome, GameState, GameStatus, SavedSession};
use ghostly_chronicles::levels;
use ghostly_chronicles::messaging::{Event, EventBus};
use ghostly_chronicles::services::{NarrativeService, ServiceClient, SpeechService};

fn main() {
    initialize_tracing();

    println!("===========================================");
    println!("  Ghostly Chronicles - The Manor Awaits");
    println!("===========================================\n");

    // Load configuration; a broken config file degrades to defaults
    let cfg = match Config::load() {
        Ok(cfg) => {
            println!("✓ Configuration loaded");
            cfg
        }
        Err(e) => {
            eprintln!("✗ Failed to load config, using defaults: {}", e);
            tracing::warn!("Config load failed: {}", e);
            Config::default()
        }
    };

    let today = chrono::Local::now().date_naive();
    let state = match SavedSession::load(today) {
        Ok(state) => {
            println!(
                "✓ Session restored (room {}, {} lives)",
                state.level(),
                state.lives()
            );
            state
        }
        Err(e) => {
            eprintln!("✗ Failed to load session, starting fresh: {}", e);
            tracing::warn!("Session load failed: {}", e);
            GameState::new(today)
        }
    };

    let client = ServiceClient::new(cfg.resolved_api_key()).with_timeout(cfg.service_timeout());
    if client.has_key() {
        println!("✓ Narrative service configured");
    } else {
        println!("· Narrative service offline - the Manor will use its own words");
    }
    let narrative = NarrativeService::new(client.clone());
    let speech = Arc::new(SpeechService::new(client));

    let bus = EventBus::new();
    let (events, _subscription) = bus.subscribe();
    let director = AudioDirector::new(AudioEngine::new(cfg.effective_volume()), speech);

    println!();
    run_game(state, bus, events, director, narrative);
}

/// Pull events published so far and hand them to the audio director.
fn pump(events: &Receiver<Event>, director: &mut AudioDirector) {
    while let Ok(event) = events.try_recv() {
        tracing::debug!(event = %event.description(), "game event");
        director.handle_event(&event);
    }
}

fn save(state: &GameState) {
    if let Err(e) = SavedSession::save(state) {
        tracing::warn!("Could not persist session: {}", e);
    }
}

/// Read one trimmed line from stdin; EOF quits.
fn read_input(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();

    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => "q".to_string(),
        Ok(_) => line.trim().to_lowercase(),
    }
}

fn run_game(
    mut state: GameState,
    bus: EventBus,
    events: Receiver<Event>,
    mut director: AudioDirector,
    narrative: NarrativeService,
) {
    loop {
        pump(&events, &mut director);

        match state.status() {
            GameStatus::Menu => {
                println!("\n        A C E ' S   G H O S T L Y   C H R O N I C L E S");
                println!("        \"The shadows are waiting for you, Ace.\"\n");
                let input = read_input("[enter] step into the dark   [q] quit > ");
                if input == "q" {
                    break;
                }
                bus.publish(Event::IntroStarted);
                state.set_status(GameStatus::Intro { beat: 0 });
            }

            GameStatus::Intro { beat } => {
                let story = &levels::INTRO_STORY;
                println!("\n\"{}\"\n", story[beat.min(story.len() - 1)].text);
                let last = beat + 1 >= story.len();
                let prompt = if last {
                    "[ proceed ] > "
                } else {
                    "[ continue ] > "
                };
                if read_input(prompt) == "q" {
                    break;
                }
                if last {
                    bus.publish(Event::ButtonPressed);
                    state.set_status(GameStatus::LevelStart);
                } else {
                    bus.publish(Event::IntroAdvanced { beat: beat + 1 });
                    state.set_status(GameStatus::Intro { beat: beat + 1 });
                }
            }

            GameStatus::LevelStart => {
                let Some(level) = levels::level(state.level()) else {
                    tracing::error!(level = state.level(), "no such room, back to the gates");
                    state.enter_level(1);
                    continue;
                };

                println!("\n──── LEVEL {} ── {} ────", level.level_number, level.title);
                println!(
                    "\"The Manor whispers your name as you approach the next threshold. \
                     Ace, keep your eyes on the shadows...\"\n"
                );
                let input = read_input("[enter] step in   [q] save & quit > ");
                if input == "q" {
                    break;
                }

                bus.publish(Event::LevelEntered {
                    level: level.level_number,
                });
                pump(&events, &mut director);

                println!("Shifting realities...");
                let ghost = narrative.spectral_encounter(
                    level.level_number,
                    level.title,
                    level.ghost_vibe,
                    state.inventory(),
                );
                if let Some(image) = narrative.room_image(level.title, level.description) {
                    cache_room_image(level.level_number, &image);
                }

                state.set_current_ghost(Some(ghost.clone()));
                bus.publish(Event::GhostAppeared {
                    level: level.level_number,
                    ghost,
                });
                state.set_status(GameStatus::Playing);
                save(&state);
            }

            GameStatus::Playing => {
                let Some(level) = levels::level(state.level()) else {
                    state.enter_level(1);
                    state.set_status(GameStatus::LevelStart);
                    continue;
                };

                render_room(&state, level);
                if director.engine().is_speaking() {
                    println!("  (the echo still speaks... [s] to silence it)");
                }
                let input = read_input("choice number, [j] journal, [s] silence, [q] save & quit > ");
                match input.as_str() {
                    "q" => break,
                    "j" => {
                        bus.publish(Event::JournalToggled);
                        render_journal(&state);
                        continue;
                    }
                    "s" => {
                        bus.publish(Event::DialogueSilenced);
                        continue;
                    }
                    other => {
                        let Ok(number) = other.parse::<usize>() else {
                            println!("The Manor does not understand.");
                            continue;
                        };
                        let Some(index) = number.checked_sub(1) else {
                            println!("The Manor does not understand.");
                            continue;
                        };

                        bus.publish(Event::ButtonPressed);
                        let Some(choice) = level.choices.get(index).copied() else {
                            println!("The Manor does not understand.");
                            continue;
                        };
                        let level_number = level.level_number;
                        let level_title = level.title;

                        match flow::resolve_choice(&mut state, index) {
                            Some(ChoiceOutcome::Blocked { item_required }) => {
                                println!(
                                    "\nA spectral chill paralyzes you! You need the {} to \
                                     proceed through this mystery.\n",
                                    item_required
                                );
                                bus.publish(Event::ChoiceBlocked { item_required });
                            }
                            Some(ChoiceOutcome::Success {
                                consequence,
                                item_found,
                            }) => {
                                println!("\n\"{}\"\n", consequence);
                                bus.publish(Event::ChoiceSucceeded {
                                    level: level_number,
                                });
                                if let Some(item) = item_found {
                                    println!("  [ {} added to your satchel ]", item);
                                    bus.publish(Event::ItemFound {
                                        item: item.to_string(),
                                    });
                                }
                                record_journal(
                                    &narrative,
                                    &mut state,
                                    level_number,
                                    level_title,
                                    choice.text,
                                    true,
                                );
                            }
                            Some(ChoiceOutcome::FinalSuccess { consequence }) => {
                                println!("\n\"{}\"\n", consequence);
                                bus.publish(Event::ChoiceSucceeded {
                                    level: level_number,
                                });
                                bus.publish(Event::GameEnded);
                                record_journal(
                                    &narrative,
                                    &mut state,
                                    level_number,
                                    level_title,
                                    choice.text,
                                    true,
                                );
                            }
                            Some(ChoiceOutcome::Failure {
                                consequence,
                                lives_left,
                            }) => {
                                println!("\n\"{}\"\n", consequence);
                                bus.publish(Event::ChoiceFailed {
                                    level: level_number,
                                    lives_left,
                                });
                                record_journal(
                                    &narrative,
                                    &mut state,
                                    level_number,
                                    level_title,
                                    choice.text,
                                    false,
                                );
                            }
                            None => {
                                println!("The Manor does not understand.");
                                continue;
                            }
                        }
                        save(&state);
                    }
                }
            }

            GameStatus::Interaction => {
                let input = read_input("[enter] advance   [q] save & quit > ");
                if input == "q" {
                    break;
                }
                let to_level = state.level() + 1;
                bus.publish(Event::DoorOpened { to_level });
                flow::advance_level(&mut state);
                save(&state);
            }

            GameStatus::LevelFailed => {
                if state.lives() > 0 {
                    println!("Lives remaining: {}", lives_display(&state));
                    let input = read_input("[enter] try again   [q] save & quit > ");
                    if input == "q" {
                        break;
                    }
                    bus.publish(Event::ButtonPressed);
                    flow::retry_level(&mut state);
                } else {
                    println!("\nThe shadows close in. Ace has nothing left tonight.");
                    println!("(Lives return with the next day's reset.)");
                    let input = read_input("[enter] surrender to the dark > ");
                    if input == "q" {
                        break;
                    }
                    bus.publish(Event::ButtonPressed);
                    state.set_status(GameStatus::Menu);
                }
                save(&state);
            }

            GameStatus::Ending => {
                println!("\n══════════════  E T E R N I T Y  ══════════════\n");
                println!(
                    "\"Ace's footsteps vanish into the stone. The silver locket clicks shut \
                     for the final time. He has found his place in the Manor's collection. \
                     He is no longer a guest... he is the host.\"\n"
                );
                let input = read_input("[enter] rebirth   [q] quit > ");
                if input == "q" {
                    break;
                }
                bus.publish(Event::ButtonPressed);
                if let Err(e) = SavedSession::delete() {
                    tracing::warn!("Could not delete session: {}", e);
                }
                state = GameState::new(chrono::Local::now().date_naive());
                save(&state);
            }
        }
    }

    pump(&events, &mut director);
    save(&state);
    println!("\nThe Manor will remember you.");
}

fn render_room(state: &GameState, level: &levels::LevelData) {
    println!("\n──── LEVEL {} ── {} ────", level.level_number, level.title);
    println!("Lives: {}   Items: {}", lives_display(state), items_display(state));
    println!("\n{}\n", level.description);

    if let Some(ghost) = state.current_ghost() {
        let nature = if ghost.is_friendly() {
            "A Helpful Memory"
        } else {
            "A Vengeful Shadow"
        };
        println!("  ~ {} ~  ({})", ghost.name, nature);
        println!("  {}", ghost.appearance);
        println!("  \"{}\"", ghost.dialogue);
        println!("  Hint: {}\n", ghost.hint);
    }

    println!("{}\n", level.mystery_prompt);
    for (i, choice) in level.choices.iter().enumerate() {
        let lock = match choice.item_required {
            Some(item) if !state.has_item(item) => format!("  [LOCKED: {}]", item),
            _ => String::new(),
        };
        println!("  {}. {}{}", i + 1, choice.text, lock);
    }
    println!();
}

fn render_journal(state: &GameState) {
    println!("\n──── SPECTRAL JOURNAL ────");
    if state.journal().is_empty() {
        println!("\"The pages are silent. Ace's journey is just beginning.\"");
    } else {
        for entry in state.journal() {
            println!("ARCHIVE {} [{:?}]", entry.level, entry.mood);
            println!("  \"{}\"", entry.content);
        }
    }
    println!("──── Ace Blackwood ────\n");
}

fn lives_display(state: &GameState) -> String {
    let full = "♥".repeat(state.lives() as usize);
    let lost = "·".repeat((levels::MAX_LIVES - state.lives()) as usize);
    format!("{}{}", full, lost)
}

fn items_display(state: &GameState) -> String {
    if state.inventory().is_empty() {
        "none".to_string()
    } else {
        state.inventory().join(", ")
    }
}

fn record_journal(
    narrative: &NarrativeService,
    state: &mut GameState,
    level: u32,
    title: &str,
    choice_text: &str,
    was_correct: bool,
) {
    let entry = narrative.journal_entry(level, title, choice_text, was_correct, state.inventory());
    state.add_journal_entry(entry);
}

/// Write generated room art to the data directory for the curious.
fn cache_room_image(level: u32, bytes: &[u8]) {
    let Some(dir) = dirs::data_dir().map(|d| d.join("GhostlyChronicles").join("rooms")) else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let path = dir.join(format!("level-{:02}.png", level));
    match std::fs::write(&path, bytes) {
        Ok(()) => {
            tracing::info!("Room art cached at {}", path.display());
            println!("  [ room art: {} ]", path.display());
        }
        Err(e) => tracing::debug!("Could not cache room art: {}", e),
    }
}

/// Initialize tracing with daily-rotated file logging.
///
/// Logs go to the platform config directory under GhostlyChronicles/logs;
/// the console stays clean for the game itself.
fn initialize_tracing() {
    use tracing_appender::rolling;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_dir = dirs::config_dir()
        .map(|dir| dir.join("GhostlyChronicles").join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("logs"));

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    let file_appender = rolling::daily(&log_dir, "ghostly-chronicles.log");

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    tracing::info!("Log directory: {}", log_dir.display());
}
