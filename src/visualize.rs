use crate::coordinate::{looks_like_coordinate, TeamCoordinate};
use crate::error::{BracketError, BracketResult};
use crate::simulator::BracketState;

/// Replace every `[R,Rd,I]` in `display_template` with the name of the team
/// that held that coordinate. Everything else is copied verbatim.
pub fn render(display_template: &str, state: &BracketState) -> BracketResult<String> {
    let mut output = String::with_capacity(display_template.len());
    let mut rest = display_template;

    while let Some(open) = rest.find('[') {
        output.push_str(&rest[..open]);
        let candidate = &rest[open..];

        let group = candidate.find(']').map(|close| &candidate[..=close]);
        match group {
            Some(group) if looks_like_coordinate(group) => {
                let coordinate: TeamCoordinate = group.parse()?;
                let name = state
                    .team_name(&coordinate)
                    .ok_or(BracketError::MissingOccupant { coordinate })?;
                output.push_str(name);
                rest = &candidate[group.len()..];
            }
            _ => {
                output.push('[');
                rest = &candidate[1..];
            }
        }
    }
    output.push_str(rest);

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::SeasonStats;

    fn state() -> BracketState {
        let mut state = BracketState::new();
        for (index, name) in ["Virginia", "UMBC"].iter().enumerate() {
            state
                .insert(
                    TeamCoordinate::new(0, 1, index as u32),
                    SeasonStats::new(2018, *name, vec![]),
                )
                .unwrap();
        }
        state
            .insert(TeamCoordinate::new(0, 2, 0), SeasonStats::new(2018, "UMBC", vec![]))
            .unwrap();
        state
    }

    #[test]
    fn test_render_substitutes_names() {
        let template = "[0,1,0],,\n,[0,2,0],\n[0,1,1],,\n";
        let rendered = render(template, &state()).unwrap();
        assert_eq!(rendered, "Virginia,,\n,UMBC,\nUMBC,,\n");
    }

    #[test]
    fn test_render_keeps_other_brackets() {
        let template = "Round [one] [0,1,0] vs [0,1,1] [unclosed";
        let rendered = render(template, &state()).unwrap();
        assert_eq!(rendered, "Round [one] Virginia vs UMBC [unclosed");
    }

    #[test]
    fn test_render_nested_bracket_text() {
        let rendered = render("[[0,1,0]]", &state()).unwrap();
        assert_eq!(rendered, "[Virginia]");
    }

    #[test]
    fn test_render_missing_coordinate() {
        let err = render("[3,4,1]", &state()).unwrap_err();
        assert!(matches!(err, BracketError::MissingOccupant { .. }));
    }
}
