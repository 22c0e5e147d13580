//! Static narrative data: the ten rooms of the Manor, their choices, and
//! the intro story beats.
//!
//! The item chain threads through the table: each room's correct choice may
//! require an item found earlier and may grant the item the next rooms need.

use crate::audio::SfxKind;

/// Lives granted at the start of each day.
pub const MAX_LIVES: u32 = 3;

/// One selectable answer to a room's mystery prompt.
#[derive(Debug, Clone, Copy)]
pub struct Choice {
    pub text: &'static str,
    pub is_correct: bool,
    /// Outcome text shown after the choice resolves.
    pub consequence: &'static str,
    /// Inventory item that must be held to select this choice.
    pub item_required: Option<&'static str>,
    /// Inventory item granted when this choice succeeds.
    pub item_found: Option<&'static str>,
}

/// A single room of the Manor.
#[derive(Debug, Clone, Copy)]
pub struct LevelData {
    pub level_number: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub mystery_prompt: &'static str,
    /// Atmosphere hint handed to the narrative service when conjuring the
    /// room's ghost.
    pub ghost_vibe: &'static str,
    pub choices: &'static [Choice],
}

/// One beat of the opening story, with the sting that accompanies it.
#[derive(Debug, Clone, Copy)]
pub struct IntroBeat {
    pub text: &'static str,
    pub sting: SfxKind,
}

pub const INTRO_STORY: [IntroBeat; 4] = [
    IntroBeat {
        text: "Ace's bicycle chain snapped just as the sun dipped behind the jagged peaks of the Forbidden Hill.",
        sting: SfxKind::Rain,
    },
    IntroBeat {
        text: "A 'Phantom Storm' rolled in. Clouds like bruised fists, smelling of old iron and wet earth.",
        sting: SfxKind::Thunder,
    },
    IntroBeat {
        text: "The gates of the Manor groaned open, inviting him into a silence that felt heavier than the rain.",
        sting: SfxKind::Door,
    },
    IntroBeat {
        text: "He stepped inside. The lock clicked. The shadows detached themselves from the floor. Ace was the manor's guest now.",
        sting: SfxKind::GhostAppear,
    },
];

pub const LEVELS: [LevelData; 10] = [
    LevelData {
        level_number: 1,
        title: "The Iron Gates",
        ghost_vibe: "A weary, ancient gatekeeper who has seen centuries of children fail to enter.",
        description: "The storm broke Ace's bike. The massive gates of the Manor are the only shelter from the unnatural cold.",
        mystery_prompt: "The gate is locked by the gargoyle's grief. How will you enter?",
        choices: &[
            Choice {
                text: "Reach into the weeping gargoyle's mouth",
                is_correct: true,
                consequence: "Your fingers brush against freezing metal. You pull out a Rusted Key.",
                item_required: None,
                item_found: Some("Rusted Key"),
            },
            Choice {
                text: "Try to scale the sharp iron bars",
                is_correct: false,
                consequence: "The iron becomes impossibly slippery and freezing. You fall into the mud.",
                item_required: None,
                item_found: None,
            },
            Choice {
                text: "Scream for help through the bars",
                is_correct: false,
                consequence: "The house hears you. A window shatters, and the gravel begins to swirl.",
                item_required: None,
                item_found: None,
            },
        ],
    },
    LevelData {
        level_number: 2,
        title: "The Dust-Choked Library",
        ghost_vibe: "An obsessive, whispering librarian who speaks in riddles and hates the sound of breathing.",
        description: "The doors slammed shut. You're trapped in a room of infinite books. A ladder slides on its own through the darkness.",
        mystery_prompt: "A secret passage is behind a shelf, but the books are shifting like a puzzle.",
        choices: &[
            Choice {
                text: "Use the Rusted Key on the clock",
                is_correct: true,
                consequence: "The clock strikes a hollow tone. A shelf of blue books swings back.",
                item_required: Some("Rusted Key"),
                item_found: Some("Old Map"),
            },
            Choice {
                text: "Search for a book titled 'The Way Out'",
                is_correct: false,
                consequence: "The books fly off the shelves, their pages sharp as razors.",
                item_required: None,
                item_found: None,
            },
            Choice {
                text: "Climb the shaky rolling ladder",
                is_correct: false,
                consequence: "The ladder accelerates toward a brick wall at high speed.",
                item_required: None,
                item_found: None,
            },
        ],
    },
    LevelData {
        level_number: 3,
        title: "The Forgotten Kitchen",
        ghost_vibe: "A manic, fire-obsessed chef who is constantly trying to 'season' the air with fear.",
        description: "The Old Map shows a way through the pantry. But a blue spectral fire burns on the stove, blocking your path.",
        mystery_prompt: "The heat is freezing cold. The stove is screaming. How do you pass?",
        choices: &[
            Choice {
                text: "Throw silver salt onto the blue flames",
                is_correct: true,
                consequence: "The salt turns the fire white. You grab a Brass Flashlight and sprint past.",
                item_required: None,
                item_found: Some("Brass Flashlight"),
            },
            Choice {
                text: "Try to run through the cold fire",
                is_correct: false,
                consequence: "The blue fire freezes your joints, leaving you vulnerable to the Chef.",
                item_required: None,
                item_found: None,
            },
            Choice {
                text: "Douse the fire with stagnant water",
                is_correct: false,
                consequence: "The water turns to steam, filling the room with a whispering fog.",
                item_required: None,
                item_found: None,
            },
        ],
    },
    LevelData {
        level_number: 4,
        title: "The Whispering Gallery",
        ghost_vibe: "A lonely child ghost who wants to play 'hide and seek' forever.",
        description: "It's pitch black. The whispers are coming from inside the walls, telling you secrets about your own past.",
        mystery_prompt: "The hallway stretches for miles in the dark. How will you see?",
        choices: &[
            Choice {
                text: "Shine the Brass Flashlight at the ceiling",
                is_correct: true,
                consequence: "The light reflects into a thousand beams, burning the gloom. You find a Winding Key.",
                item_required: Some("Brass Flashlight"),
                item_found: Some("Winding Key"),
            },
            Choice {
                text: "Feel your way along the wallpaper",
                is_correct: false,
                consequence: "The patterns on the wallpaper become hands. They pull you into the drywall.",
                item_required: None,
                item_found: None,
            },
            Choice {
                text: "Sing a song to keep your courage up",
                is_correct: false,
                consequence: "The echo returns as a thousand twisted voices singing a funeral march.",
                item_required: None,
                item_found: None,
            },
        ],
    },
    LevelData {
        level_number: 5,
        title: "The Attic of Lost Toys",
        ghost_vibe: "A mechanical, stiff dollmaker who moves like a clockwork toy with broken springs.",
        description: "Dolls watch you with glass eyes. A giant mechanical soldier blocks the trapdoor.",
        mystery_prompt: "The soldier needs a 'Heart of Gears' to let you pass. Where is it?",
        choices: &[
            Choice {
                text: "Place the Winding Key in the heart-slot",
                is_correct: true,
                consequence: "The soldier clicks aside. He drops a Silver Locket. You take it.",
                item_required: Some("Winding Key"),
                item_found: Some("Silver Locket"),
            },
            Choice {
                text: "Try to dismantle the soldier",
                is_correct: false,
                consequence: "His lead hands crush your wrist. The dolls crawl out of their boxes.",
                item_required: None,
                item_found: None,
            },
            Choice {
                text: "Distract the dolls with marbles",
                is_correct: false,
                consequence: "The dolls catch the marbles and throw them back with impossible speed.",
                item_required: None,
                item_found: None,
            },
        ],
    },
    LevelData {
        level_number: 6,
        title: "The Conservatory of Dead Vines",
        ghost_vibe: "A prickly, ancient gardener who has become one with the thorns and black roses.",
        description: "The Silver Locket starts glowing with a blue light. The vines here pulsate like a beating heart.",
        mystery_prompt: "The exit is choked by thorns. The gardener is reaching out. What do you give?",
        choices: &[
            Choice {
                text: "Offer the Silver Locket to the gardener",
                is_correct: true,
                consequence: "The glow calms the vines. They wither back, revealing a Mirror Shard.",
                item_required: Some("Silver Locket"),
                item_found: Some("Mirror Shard"),
            },
            Choice {
                text: "Try to hack through the vines",
                is_correct: false,
                consequence: "The thorns wrap around your throat and pull you into the dark mulch.",
                item_required: None,
                item_found: None,
            },
            Choice {
                text: "Hide in the giant glass terrarium",
                is_correct: false,
                consequence: "The glass becomes opaque. The gardener taps on the outside, laughing.",
                item_required: None,
                item_found: None,
            },
        ],
    },
    LevelData {
        level_number: 7,
        title: "The Grand Ballroom",
        ghost_vibe: "An elegant but decaying ballerina who dances on shards of broken memories.",
        description: "A faceless dance is occurring. The floor is a mosaic of traps. The music is a scratchy violin.",
        mystery_prompt: "The dancers are blocking the exit. How do you find the true door?",
        choices: &[
            Choice {
                text: "Use the Mirror Shard to look backwards",
                is_correct: true,
                consequence: "The shard reveals that the exit is a painting. You walk through the canvas.",
                item_required: Some("Mirror Shard"),
                item_found: None,
            },
            Choice {
                text: "Try to join the dance",
                is_correct: false,
                consequence: "Your feet become heavy. You are turning into a stone statue.",
                item_required: None,
                item_found: None,
            },
            Choice {
                text: "Sprint across the dance floor",
                is_correct: false,
                consequence: "The tiles flip like hungry mouths. You fall into the cellar of bones.",
                item_required: None,
                item_found: None,
            },
        ],
    },
    LevelData {
        level_number: 8,
        title: "The Mirror Hallway",
        ghost_vibe: "A mischievous reflection ghost who mimics your move with a sinister delay.",
        description: "Every mirror shows a darker version of Ace. One Ace is holding the way out, but his eyes are black.",
        mystery_prompt: "Which mirror is the real door? The locket is vibrating.",
        choices: &[
            Choice {
                text: "Touch the mirror reflecting the locket's glow",
                is_correct: true,
                consequence: "The glass becomes liquid. You step through into the Master Bedchamber.",
                item_required: Some("Silver Locket"),
                item_found: None,
            },
            Choice {
                text: "Touch the mirror showing your parents",
                is_correct: false,
                consequence: "It's a Trap. The glass sucks you into a void of 'Could-Have-Beens'.",
                item_required: None,
                item_found: None,
            },
            Choice {
                text: "Break the mirrors with the Rusted Key",
                is_correct: false,
                consequence: "Seven spectral wolves made of glass shards manifest instantly.",
                item_required: None,
                item_found: None,
            },
        ],
    },
    LevelData {
        level_number: 9,
        title: "The Master Bedchamber",
        ghost_vibe: "A deep, booming 'Master of the House' who sounds like ancient storms.",
        description: "The breathing behind the curtains is deafening. The bed is as large as a ship.",
        mystery_prompt: "The 'Master' is shifting in his sleep. His shadow is growing. Where is the key?",
        choices: &[
            Choice {
                text: "Blaze the Flashlight at the curtains",
                is_correct: true,
                consequence: "The Master hisses and retreats. You grab the Cellar Key.",
                item_required: Some("Brass Flashlight"),
                item_found: Some("Cellar Key"),
            },
            Choice {
                text: "Crawl under the bed to hide",
                is_correct: false,
                consequence: "There are things under the bed that pull you down into the dark.",
                item_required: None,
                item_found: None,
            },
            Choice {
                text: "Whisper a lullaby",
                is_correct: false,
                consequence: "The Master hates music. He opens his eyes, vast voids that swallow your light.",
                item_required: None,
                item_found: None,
            },
        ],
    },
    LevelData {
        level_number: 10,
        title: "The Secret Cellar",
        ghost_vibe: "A chorus of all the ghosts you've met, their voices merging into one final judgment.",
        description: "The ritual circle is complete. Ace sees his name on a stone. The air is freezing.",
        mystery_prompt: "The house wants its final payment. Will you accept the key?",
        choices: &[
            Choice {
                text: "Insert the Cellar Key into the stone",
                is_correct: true,
                consequence: "The lock turns. The world goes black. Ace steps into the dark forever.",
                item_required: Some("Cellar Key"),
                item_found: None,
            },
            Choice {
                text: "Try to run back up the stairs",
                is_correct: false,
                consequence: "The stairs collapse. There is only the void below, and it is hungry.",
                item_required: None,
                item_found: None,
            },
            Choice {
                text: "Throw items into the ritual circle",
                is_correct: false,
                consequence: "The shadows consume the items and then turn their hunger toward you.",
                item_required: None,
                item_found: None,
            },
        ],
    },
];

/// Look up a level by its 1-based number.
pub fn level(number: u32) -> Option<&'static LevelData> {
    LEVELS.get(number.checked_sub(1)? as usize)
}

pub fn final_level() -> u32 {
    LEVELS.len() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_level_lookup() {
        assert_eq!(level(1).unwrap().title, "The Iron Gates");
        assert_eq!(level(10).unwrap().title, "The Secret Cellar");
        assert!(level(0).is_none());
        assert!(level(11).is_none());
    }

    #[test]
    fn test_level_numbers_are_sequential() {
        for (idx, lvl) in LEVELS.iter().enumerate() {
            assert_eq!(lvl.level_number, idx as u32 + 1);
        }
    }

    #[test]
    fn test_every_level_has_exactly_one_correct_choice() {
        for lvl in &LEVELS {
            let correct = lvl.choices.iter().filter(|c| c.is_correct).count();
            assert_eq!(correct, 1, "level {} must have one answer", lvl.level_number);
        }
    }

    #[test]
    fn test_item_chain_is_satisfiable() {
        // Walking the correct path from level 1, every required item must
        // already have been granted by an earlier correct choice.
        let mut held: HashSet<&str> = HashSet::new();
        for lvl in &LEVELS {
            let choice = lvl.choices.iter().find(|c| c.is_correct).unwrap();
            if let Some(required) = choice.item_required {
                assert!(
                    held.contains(required),
                    "level {} needs '{}' before it is obtainable",
                    lvl.level_number,
                    required
                );
            }
            if let Some(found) = choice.item_found {
                held.insert(found);
            }
        }
        assert!(held.contains("Cellar Key"));
    }

    #[test]
    fn test_intro_story_has_four_beats() {
        assert_eq!(INTRO_STORY.len(), 4);
        assert_eq!(INTRO_STORY[1].sting, SfxKind::Thunder);
        assert_eq!(INTRO_STORY[3].sting, SfxKind::GhostAppear);
    }
}
