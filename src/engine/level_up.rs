use crate::model::game_state::{LogEntry, PlayerState};

/// Advance the player one level per accumulated experience threshold.
/// Checked after every reconciliation rather than inside it, and re-entrant:
/// a single large experience grant can cross several thresholds, so the
/// check loops until exp sits below the (growing) requirement again.
pub fn apply_level_ups(player: &mut PlayerState, log: &mut Vec<LogEntry>) {
    while player.exp >= player.max_exp {
        // A non-positive threshold would never converge.
        if player.max_exp <= 0 {
            log::warn!("level-up skipped: max exp is {}", player.max_exp);
            break;
        }

        player.lvl += 1;
        // Remainder carries forward instead of resetting to zero.
        player.exp -= player.max_exp;
        player.max_exp = (player.max_exp as f64 * 1.5).floor() as i64;
        player.max_hp += 20;
        player.max_mp += 10;
        player.hp = player.max_hp;
        player.mp = player.max_mp;
        player.atk += 3;
        player.def += 2;

        log.push(LogEntry::System {
            content: format!("DING! Anda telah mencapai Level {}!", player.lvl),
        });
        log.push(LogEntry::System {
            content: "HP dan MP telah pulih sepenuhnya. Status meningkat!".to_string(),
        });
    }
}
