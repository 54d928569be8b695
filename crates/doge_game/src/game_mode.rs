//! The five mini-games and their intro texts.

use doge_core::math::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
    Mac,
    Planit,
    Shower,
    ConstrainedChaos,
    Daycare,
}

impl GameMode {
    pub const ALL: [GameMode; 5] = [
        GameMode::Mac,
        GameMode::Planit,
        GameMode::Shower,
        GameMode::ConstrainedChaos,
        GameMode::Daycare,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Position in [`GameMode::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Debug hotkey assignment: `1`..=`5`.
    pub fn from_debug_digit(digit: u8) -> Option<Self> {
        match digit {
            1 => Some(GameMode::Mac),
            2 => Some(GameMode::Shower),
            3 => Some(GameMode::Planit),
            4 => Some(GameMode::ConstrainedChaos),
            5 => Some(GameMode::Daycare),
            _ => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            GameMode::Mac => "Survive in space!",
            GameMode::Planit => "Time to Refill!",
            GameMode::Shower => "Steal The Energy!",
            GameMode::ConstrainedChaos => "Constrained Chaos!",
            GameMode::Daycare => "Day Care!",
        }
    }

    pub fn story(self) -> &'static str {
        match self {
            GameMode::Mac => {
                "In this stage, you and the other players are in outer space fixing the \
                 spaceship. After fixing there are meteorites floating towards you. This \
                 is a chance to show others that you have better skills surviving. Try \
                 and dodge the meteorites as long as possible to earn more points."
            }
            GameMode::Planit => {
                "There are packs of energy found beside a planet. You and other players \
                 made a decision to each grab a pack to refill the spaceship. Shooting \
                 straight towards the energy is dangerous with the bursting speed. The \
                 good news is that the planet has been detected with strong gravity. \
                 Utilize the gravity to float like a boomerang to decrease the speed, by \
                 doing this allows you to be safe!"
            }
            GameMode::Shower => {
                "You have been teleported to an unknown planet. The evil alien is \
                 summoning Doge's biggest enemy: \"Cats\". The cats will scratch you \
                 when they touch you, it hurts a lot and you will get injured. However, the cat's favorite food and energy \"Sushi\" will also \
                 accidentally be dropped from the sky. Try and catch as much Sushi as \
                 possible before you get scratched. Stealing sushi makes the kingdom of \
                 Cats weaker!"
            }
            GameMode::ConstrainedChaos => {
                "At this stage, you and the other players have to navigate a dangerous \
                 path. In the middle of the map, there is a device throwing revolving \
                 weapons. The player has to get to the right side of the map as quickly \
                 as possible, and avoid any weapons that come at any time. The game \
                 tests not only the player's judgment but also your courage."
            }
            GameMode::Daycare => {
                "Doge-y Daycare is a mini game where you have to manage a \"daycare\" \
                 full of puppies. These puppies need to get enough food, water and play \
                 time to feel as happy as possible. Place a puppy near a food bowl, \
                 water bowl or chew toy to increase fulfillment in the corresponding \
                 category. However, puppies get distracted. Don't be surprised if you \
                 find your puppies wandering off somewhere. Once the time is up, you \
                 will be awarded points based on the average happiness of your puppies."
            }
        }
    }

    pub fn help(self) -> &'static [&'static str] {
        match self {
            GameMode::Mac => &[
                "Use the UP, DOWN, LEFT, RIGHT key to move",
                "Try to survive longer than others before you get hit!",
            ],
            GameMode::Planit => &[
                "Use the mouse to choose an angle",
                "Press SPACE to launch and fly around the planet.",
            ],
            GameMode::Shower => &[
                "Use the LEFT and RIGHT key to move",
                "Press the SPACE button to jump",
            ],
            GameMode::ConstrainedChaos => &[
                "Use arrow keys to dodge the spring",
                "don't get hit by it!",
            ],
            GameMode::Daycare => &[
                "Hover over a puppy with the mouse and hold",
                "F to move the puppies around the daycare.",
            ],
        }
    }

    /// Backdrop of the intro screen.
    pub fn intro_background(self) -> Vec3 {
        match self {
            GameMode::Mac => Vec3::new(0.298, 0.0, 0.945),
            GameMode::Planit => Vec3::new(0.09, 0.259, 0.714),
            GameMode::Shower => Vec3::new(0.973, 0.561, 0.549),
            GameMode::ConstrainedChaos => Vec3::new(0.898, 0.263, 0.016),
            GameMode::Daycare => Vec3::new(0.914, 0.553, 0.961),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for (i, mode) in GameMode::ALL.iter().enumerate() {
            assert_eq!(GameMode::from_index(i), Some(*mode));
            assert_eq!(mode.index(), i);
        }
        assert_eq!(GameMode::from_index(GameMode::COUNT), None);
    }

    #[test]
    fn test_debug_digits_cover_every_game() {
        let mapped: Vec<_> = (1..=5).filter_map(GameMode::from_debug_digit).collect();
        assert_eq!(mapped.len(), GameMode::COUNT);
        assert_eq!(GameMode::from_debug_digit(2), Some(GameMode::Shower));
        assert_eq!(GameMode::from_debug_digit(0), None);
    }
}
