pub fn type_symbol(creature_type: &str) -> &'static str {
    match creature_type {
        "normal" => "○",
        "fire" => "🔥",
        "water" => "💧",
        "electric" => "⚡",
        "grass" => "🌿",
        "ice" => "❄️",
        "fighting" => "👊",
        "poison" => "☠️",
        "ground" => "⛰️",
        "flying" => "🦅",
        "psychic" => "🔮",
        "bug" => "🐛",
        "rock" => "🪨",
        "ghost" => "👻",
        "dragon" => "🐉",
        "dark" => "🌙",
        "steel" => "⚙️",
        "fairy" => "✨",
        _ => "○",
    }
}

/// Light and heavy attack names for a type.
pub fn attack_names(creature_type: &str) -> [&'static str; 2] {
    match creature_type {
        "fire" => ["Ember", "Fire Blast"],
        "water" => ["Water Gun", "Hydro Pump"],
        "electric" => ["Thunder Shock", "Thunderbolt"],
        "grass" => ["Vine Whip", "Solar Beam"],
        "normal" => ["Tackle", "Hyper Beam"],
        "psychic" => ["Confusion", "Psychic"],
        "fighting" => ["Karate Chop", "Dynamic Punch"],
        "poison" => ["Poison Sting", "Sludge Bomb"],
        "ground" => ["Mud Shot", "Earthquake"],
        "flying" => ["Wing Attack", "Sky Attack"],
        "bug" => ["Bug Bite", "X-Scissor"],
        "rock" => ["Rock Throw", "Stone Edge"],
        "ghost" => ["Shadow Ball", "Phantom Force"],
        "dragon" => ["Dragon Breath", "Dragon Claw"],
        "dark" => ["Bite", "Dark Pulse"],
        "steel" => ["Metal Claw", "Iron Tail"],
        "ice" => ["Ice Shard", "Blizzard"],
        "fairy" => ["Fairy Wind", "Moonblast"],
        _ => ["Quick Attack", "Power Strike"],
    }
}

pub fn weakness(creature_type: &str) -> &'static str {
    match creature_type {
        "fire" => "water",
        "water" => "electric",
        "electric" => "ground",
        "grass" => "fire",
        "ice" => "fire",
        "fighting" => "psychic",
        "poison" => "psychic",
        "ground" => "water",
        "flying" => "electric",
        "psychic" => "dark",
        "bug" => "fire",
        "rock" => "fighting",
        "ghost" => "dark",
        "dragon" => "ice",
        "dark" => "fighting",
        "steel" => "fire",
        "normal" => "fighting",
        "fairy" => "poison",
        _ => "normal",
    }
}

pub fn resistance(creature_type: &str) -> Option<&'static str> {
    match creature_type {
        "fire" => Some("grass"),
        "water" => Some("fire"),
        "electric" => Some("flying"),
        "grass" => Some("water"),
        "ice" => Some("ice"),
        "fighting" => Some("bug"),
        "poison" => Some("grass"),
        "ground" => Some("electric"),
        "flying" => Some("fighting"),
        "psychic" => Some("fighting"),
        "bug" => Some("grass"),
        "rock" => Some("fire"),
        "ghost" => Some("poison"),
        "dragon" => Some("fire"),
        "dark" => Some("psychic"),
        "steel" => Some("psychic"),
        "fairy" => Some("fighting"),
        _ => None,
    }
}
