use crate::aggregate::PlayerAggregate;

/// Strict Pareto filter on (average PIR up, stddev down).
///
/// A player is dominated when some other player has strictly higher average
/// AND strictly lower spread; ties on either axis never dominate. Order is
/// preserved from the input. The pairwise scan is quadratic, which is fine
/// for league-sized pools (<300 players); a sorted-frontier sweep would be
/// the upgrade path if that ever changes.
pub fn dominant_players(players: &[PlayerAggregate]) -> Vec<PlayerAggregate> {
    players
        .iter()
        .filter(|p| {
            !players
                .iter()
                .any(|q| q.average_pir > p.average_pir && q.stddev_pir < p.stddev_pir)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agg(name: &str, average_pir: f64, stddev_pir: f64) -> PlayerAggregate {
        PlayerAggregate {
            player_name: name.to_string(),
            average_pir,
            stddev_pir,
            cr: None,
            position: None,
            injury_status: None,
            injury: None,
        }
    }

    #[test]
    fn test_pareto_front_with_four_points() {
        // B dominates A (15>10, 3<5) and C (15>8, 3<6). D is on the front:
        // nobody has both a higher average and a lower spread than D.
        let players = vec![
            agg("A", 10.0, 5.0),
            agg("B", 15.0, 3.0),
            agg("C", 8.0, 6.0),
            agg("D", 18.0, 7.0),
        ];
        let front = dominant_players(&players);
        let names: Vec<&str> = front.iter().map(|p| p.player_name.as_str()).collect();
        assert_eq!(names, vec!["B", "D"]);
    }

    #[test]
    fn test_equal_axis_values_do_not_dominate() {
        // Same stddev: neither dominates the other, both survive.
        let players = vec![agg("A", 10.0, 4.0), agg("B", 12.0, 4.0)];
        let front = dominant_players(&players);
        assert_eq!(front.len(), 2);
    }

    #[test]
    fn test_order_preserved_from_input() {
        let players = vec![
            agg("C", 8.0, 2.0),
            agg("A", 20.0, 9.0),
            agg("B", 15.0, 5.0),
        ];
        // All three are mutually non-dominated (higher average always comes
        // with higher spread here).
        let front = dominant_players(&players);
        let names: Vec<&str> = front.iter().map(|p| p.player_name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(dominant_players(&[]).is_empty());
    }
}
