/// Build the party-host prompt for one turn.
///
/// `player_names` is the whole roster; the active player is listed separately
/// and left out of the "other players" line.
pub fn build_prompt(
    difficulty: &str,
    player_names: &[String],
    current_player_name: &str,
) -> String {
    let others: Vec<&str> = player_names
        .iter()
        .map(String::as_str)
        .filter(|name| *name != current_player_name)
        .collect();
    let others = if others.is_empty() {
        "none".to_string()
    } else {
        others.join(", ")
    };

    format!(
        "You are a party game host. Generate a single, short, fun party game task/dare.\n\
         - Context: A mobile pass-and-play game.\n\
         - Current Player: {}\n\
         - Other Players available: {}\n\
         - Difficulty/Mode: {}\n\
         Rules:\n\
         1. Under 30 seconds.\n\
         2. No intro text, just the task.",
        current_player_name, others, difficulty
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_prompt_excludes_current_player_from_others() {
        let prompt = build_prompt("intense", &names(&["Alice", "Bob", "Cara"]), "Bob");
        assert!(prompt.contains("Current Player: Bob"));
        assert!(prompt.contains("Other Players available: Alice, Cara"));
        assert!(prompt.contains("Difficulty/Mode: intense"));
        assert!(prompt.contains("No intro text, just the task."));
    }

    #[test]
    fn test_prompt_with_single_player() {
        let prompt = build_prompt("fun", &names(&["Alice"]), "Alice");
        assert!(prompt.contains("Other Players available: none"));
    }
}
