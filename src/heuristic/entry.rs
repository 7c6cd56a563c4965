//! §4.2.2 bar entry: danger from trying to enter against a partly-closed
//! opponent home board. Both outputs grow with how *closed* the board is —
//! they are risk measures, not entry-chance measures, despite the name.

/// `(enter, enter2)` given the opponent's home board counts (points 0..6,
/// opponent's own frame) and how many of the side's own chequers are on
/// the bar. With two or more on the bar every closed point threatens more
/// than one entering chequer, so its danger contribution is counted twice.
pub fn entry_stats(opp_home: &[u8; 6], own_bar: u8) -> (f32, f32) {
    let closed: Vec<usize> = (0..6).filter(|&i| opp_home[i] >= 2).collect();

    let mut loss = 0f32;
    for &i in &closed {
        loss += 4.0 * (i as f32 + 1.0);
    }
    for a in 0..closed.len() {
        for &b in &closed[a + 1..] {
            loss += 2.0 * (closed[a] as f32 + b as f32 + 2.0);
        }
    }
    if own_bar >= 2 {
        for &i in &closed {
            loss += 4.0 * (i as f32 + 1.0);
        }
    }
    let enter = loss / (36.0 * 49.0 / 6.0);

    let n = closed.len() as i32;
    let enter2 = (36 - (n - 6).pow(2)) as f32 / 36.0;

    (enter, enter2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_board_has_no_entry_danger() {
        let home = [0u8; 6];
        let (enter, enter2) = entry_stats(&home, 1);
        assert_eq!(enter, 0.0);
        assert_eq!(enter2, 0.0);
    }

    #[test]
    fn fully_closed_board_pins_enter2_at_one() {
        let home = [2u8; 6];
        let (enter, enter2) = entry_stats(&home, 1);
        assert_eq!(enter2, 1.0);
        assert!(enter > 0.0);
    }

    #[test]
    fn enter2_stays_in_unit_range() {
        for n in 0..=6 {
            let mut home = [0u8; 6];
            for i in 0..n {
                home[i] = 2;
            }
            let (_, enter2) = entry_stats(&home, 1);
            assert!((0.0..=1.0).contains(&enter2));
        }
    }

    #[test]
    fn multiple_on_bar_increases_entry_danger_over_one_on_bar() {
        let home = [2, 2, 0, 0, 0, 0];
        let (enter_one, _) = entry_stats(&home, 1);
        let (enter_multi, _) = entry_stats(&home, 2);
        assert!(enter_multi > enter_one);
    }
}
