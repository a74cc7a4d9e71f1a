use rand::Rng;

/// Pre-authored tasks served when no provider can answer
pub const BACKUP_TASKS: &[&str] = &[
    "Do 10 pushups immediately.",
    "Let the group go through your photo gallery for 1 minute.",
    "Speak in a fake accent for the next 2 rounds.",
    "Try to lick your elbow.",
    "Let another player send a text to anyone in your contacts.",
    "Hold your breath for 30 seconds.",
    "Dance without music for 20 seconds.",
    "Tell the group your most embarrassing moment.",
    "Let the person to your right mix a drink for you.",
    "Imitate a monkey until your next turn.",
];

/// Suffix that tells the UI a task came from the backup list
pub const BACKUP_MARKER: &str = "(Backup)";

const DEV_PREFIX: &str = "[DEV]";

/// Random backup task, suffixed with the backup marker
pub fn backup_task() -> String {
    let mut rng = rand::rng();
    let task = BACKUP_TASKS[rng.random_range(0..BACKUP_TASKS.len())];
    format!("{} {}", task, BACKUP_MARKER)
}

/// Backup task for offline development, prefixed so it is obvious on screen
pub fn dev_task() -> String {
    format!("{} {}", DEV_PREFIX, backup_task())
}

pub fn is_backup(text: &str) -> bool {
    text.ends_with(BACKUP_MARKER)
}
