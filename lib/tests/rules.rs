use rand::{rngs::StdRng, SeedableRng};
use rcasim_lib::{
    rules::{canonicalize, MinMax, Rule, RuleSpace, TableExport},
    Coord, Error as CaError, Grid, Simulator, State, ALIVE, DEAD,
};
use std::error::Error;

const RULES: [&str; 16] = [
    "B3/S23",
    "23/3",
    "B36/S23",
    "B3/S23V",
    "B2/S34H",
    "R2,C2,S2-3,B3,NM",
    "R3,C0,S2,4,6-9,B3,5,NN",
    "12/34/3",
    "R2,C4,S2-3,B3,NM",
    "R1,D0,S2,3,B3,NM",
    "B2n3/S23-q",
    "B3/S23|B36/S23",
    "R2,C3,W123456",
    "R1,G3,L1,B3,S2-3,RB3,6,RS5,8,NM",
    "B002021/M/M/S000011300030003120012201210021102111/C4",
    "R1,C2,S2,3,B3,N@0FF",
];

#[test]
fn canonical_forms() -> Result<(), Box<dyn Error>> {
    for &rule_string in RULES.iter() {
        let canonical = canonicalize(rule_string)?;
        assert_eq!(canonicalize(&canonical)?, canonical, "{}", rule_string);
        assert_eq!(
            canonical.parse::<RuleSpace>()?,
            rule_string.parse::<RuleSpace>()?,
            "{}",
            rule_string
        );
    }
    assert_eq!(canonicalize("23/3")?, "B3/S23");
    assert_eq!(canonicalize(" B3/S23 ")?, "B3/S23");
    assert_eq!(canonicalize("W110")?, "W110");
    assert_eq!(
        canonicalize("R1,C2,S2,3,B3,N@0FF")?,
        canonicalize("R1,C2,S2,3,B3,N@FF")?
    );
    Ok(())
}

#[test]
fn rule_spaces() -> Result<(), Box<dyn Error>> {
    let family = |s: &str| s.parse::<RuleSpace>().map(|rule| rule.family());
    assert_eq!(family("B3/S23")?, "HROT");
    assert_eq!(family("R2,C0,S2-3,B3,NM")?, "HROT");
    assert_eq!(family("12/34/3")?, "HROT Generations");
    assert_eq!(family("R1,D1,S2,3,B3,NM")?, "Deficient HROT");
    assert_eq!(family("B2n3/S23-q")?, "Isotropic Non-Totalistic");
    assert_eq!(family("B3/S23|B36/S23")?, "Alternating");
    assert_eq!(family("W30")?, "1D");
    assert_eq!(
        family("R1,G3,L1,B3,S2-3,RB3,6,RS5,8,NM")?,
        "HROT Regenerating Generations"
    );
    assert_eq!(family("B30/M0l/S/C3")?, "Multistate Cyclic HROT");
    assert_eq!(family("R1,C3,B0,2,M,S,NM")?, "Multistate Cyclic HROT");

    let rule: RuleSpace = "12/34/3".parse()?;
    assert_eq!(rule.num_states(), 3);
    let rule: RuleSpace = "R2,C2,S2-3,B3,NM".parse()?;
    assert_eq!(rule.neighbourhood(0).len(), 24);
    Ok(())
}

#[test]
fn classic_suffixes() -> Result<(), Box<dyn Error>> {
    assert_eq!(canonicalize("b2/s013v")?, "B2/S013V");
    assert_eq!(canonicalize("23/3H")?, "B3/S23H");
    let rule: RuleSpace = "B2/S013V".parse()?;
    assert_eq!(rule.neighbourhood(0).len(), 4);
    let rule: RuleSpace = "B2/S34H".parse()?;
    assert_eq!(rule.neighbourhood(0).len(), 6);

    assert_eq!(canonicalize("B2/S013/3V")?, "013/2/3V");
    let rule: RuleSpace = "g4b24s13h".parse()?;
    assert_eq!(rule.family(), "HROT Generations");
    assert_eq!(rule.to_string(), "13/24/4H");

    // Counts beyond the size of the neighbourhood.
    assert!("B5/S23V".parse::<RuleSpace>().is_err());
    assert!("B7/S23H".parse::<RuleSpace>().is_err());
    assert!("B5/S2/3V".parse::<RuleSpace>().is_err());
    Ok(())
}

#[test]
fn invalid_rules() {
    assert!(matches!(
        "B3/S23/Q".parse::<RuleSpace>(),
        Err(CaError::InvalidRule(_))
    ));
    assert!(matches!(
        "R2,C2,S2-30,B3,NM".parse::<RuleSpace>(),
        Err(CaError::InvalidRule(_))
    ));
    assert!(matches!("".parse::<RuleSpace>(), Err(CaError::InvalidRule(_))));
    assert_eq!(
        "B3/S23|12/34/3".parse::<RuleSpace>(),
        Err(CaError::StateCountMismatch)
    );
}

#[test]
fn life_transitions() -> Result<(), Box<dyn Error>> {
    let rule: RuleSpace = "B3/S23".parse()?;
    let neighbours = |n: usize| {
        let mut states = vec![DEAD; 8];
        states[..n].iter_mut().for_each(|s| *s = ALIVE);
        states
    };
    assert_eq!(rule.transition(&neighbours(3), DEAD, 0), ALIVE);
    assert_eq!(rule.transition(&neighbours(2), DEAD, 0), DEAD);
    assert_eq!(rule.transition(&neighbours(2), ALIVE, 0), ALIVE);
    assert_eq!(rule.transition(&neighbours(4), ALIVE, 0), DEAD);
    assert_eq!(rule.background(), &[DEAD]);
    assert_eq!(rule.alternating_period(), 1);
    Ok(())
}

#[test]
fn generations_decay() -> Result<(), Box<dyn Error>> {
    let rule: RuleSpace = "12/34/4".parse()?;
    let neighbours = vec![DEAD; 8];
    assert_eq!(rule.transition(&neighbours, ALIVE, 0), State(2));
    assert_eq!(rule.transition(&neighbours, State(2), 0), State(3));
    assert_eq!(rule.transition(&neighbours, State(3), 0), DEAD);
    assert_eq!(rule.transition(&neighbours, DEAD, 0), DEAD);
    Ok(())
}

#[test]
fn isotropic_transitions() -> Result<(), Box<dyn Error>> {
    let rule: RuleSpace = "B2n3/S23".parse()?;
    // Neighbours clockwise from the north-west corner.
    let ring = |alive: &[usize]| {
        let mut states = vec![DEAD; 8];
        for &i in alive {
            states[i] = ALIVE;
        }
        states
    };
    assert_eq!(rule.transition(&ring(&[0, 4]), DEAD, 0), ALIVE);
    assert_eq!(rule.transition(&ring(&[2, 6]), DEAD, 0), ALIVE);
    assert_eq!(rule.transition(&ring(&[1, 5]), DEAD, 0), DEAD);
    assert_eq!(rule.transition(&ring(&[0, 1, 2]), DEAD, 0), ALIVE);
    Ok(())
}

#[test]
fn b0_backgrounds() -> Result<(), Box<dyn Error>> {
    let rule: RuleSpace = "B0/S".parse()?;
    assert_eq!(rule.background(), &[DEAD, ALIVE]);
    assert_eq!(rule.alternating_period(), 2);
    assert_eq!(rule.convert_state(DEAD, 1), ALIVE);
    assert_eq!(rule.convert_state(ALIVE, 1), DEAD);

    let rule: RuleSpace = "B0/S8".parse()?;
    assert_eq!(rule.background(), &[ALIVE]);

    let mut simulator = Simulator::with_grid("B0/S".parse::<RuleSpace>()?, "o!".parse()?);
    simulator.step();
    assert_eq!(simulator.background(), ALIVE);
    assert_eq!(simulator.population(), 9);
    assert_eq!(simulator.actual_cell(Coord::new(5, 5)), ALIVE);
    assert_eq!(simulator.actual_cell(Coord::new(1, 1)), DEAD);
    simulator.step();
    assert_eq!(simulator.background(), DEAD);

    let mut empty = Simulator::new("B0/S".parse::<RuleSpace>()?);
    empty.step_by(3);
    assert_eq!(empty.population(), 0);
    assert_eq!(empty.background(), ALIVE);
    Ok(())
}

#[test]
fn alternating() -> Result<(), Box<dyn Error>> {
    let rule: RuleSpace = "B3/S23|B36/S23".parse()?;
    let six = vec![ALIVE, ALIVE, ALIVE, ALIVE, ALIVE, ALIVE, DEAD, DEAD];
    assert_eq!(rule.transition(&six, DEAD, 0), DEAD);
    assert_eq!(rule.transition(&six, DEAD, 1), ALIVE);
    assert_eq!(rule.alternating_period(), 2);
    assert_eq!(rule.to_string(), "B3/S23|B36/S23");
    Ok(())
}

#[test]
fn one_dimensional() -> Result<(), Box<dyn Error>> {
    let mut simulator = Simulator::with_grid("W90".parse::<RuleSpace>()?, "o!".parse()?);
    simulator.step_by(3);
    let expected: Grid = "3bo$2bobo$bo3bo$obobobo!".parse()?;
    let mut actual = Grid::new();
    actual.insert_cells(simulator.grid(), Coord::new(3, 0));
    assert_eq!(actual, expected);
    Ok(())
}

#[test]
fn min_max_rules() -> Result<(), Box<dyn Error>> {
    let rule: RuleSpace = "B3/S23".parse()?;
    let block: Grid = "oo$oo!".parse()?;
    let (min, max) = rule.min_max(&[block.clone(), block], 0)?;
    assert!(rule.between_min_max(&min, &max)?);
    assert!(min.between_min_max(&min, &max)?);
    assert!(max.between_min_max(&min, &max)?);
    assert!(rule.valid_min_max(&min, &max));
    assert_eq!(min.to_string(), "B/S3");

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let random = rule.randomise(&min, &max, &mut rng)?;
        assert!(random.between_min_max(&min, &max)?);
    }

    let int: RuleSpace = "B2n3/S23".parse()?;
    assert_eq!(
        rule.between_min_max(&int, &int),
        Err(CaError::IncompatibleMinMax)
    );
    let alternating: RuleSpace = "B3/S23|B36/S23".parse()?;
    assert!(matches!(
        alternating.min_max(&[], 0),
        Err(CaError::Unsupported(_))
    ));
    Ok(())
}

#[test]
fn rule_tables() -> Result<(), Box<dyn Error>> {
    let rule: RuleSpace = "B3/S23".parse()?;
    let table = rule.rule_table()?.to_string();
    assert!(table.starts_with("@RULE B3_S23\n@TABLE\nn_states:2\n"));
    assert!(table.contains("symmetries:permute\n"));

    let rule: RuleSpace = "12/34/3".parse()?;
    assert!(rule.rule_table()?.to_string().contains("n_states:3\n"));

    let rule: RuleSpace = "B2n3/S23-q".parse()?;
    let table = rule.rule_table()?.to_string();
    assert!(table.contains("neighborhood:Moore\n"));
    assert!(table.contains("symmetries:rotate4reflect\n"));

    for unsupported in ["B0/S", "B3/S23|B36/S23", "W110"].iter() {
        let rule: RuleSpace = unsupported.parse()?;
        assert!(matches!(rule.rule_table(), Err(CaError::Unsupported(_))));
    }
    Ok(())
}

#[test]
fn simulator_edits() -> Result<(), Box<dyn Error>> {
    let mut simulator = Simulator::with_grid("12/34/3".parse::<RuleSpace>()?, "A2B!".parse()?);
    assert_eq!(simulator.population(), 3);
    simulator.set_rule("B3/S23".parse()?);
    assert_eq!(simulator.population(), 1);
    assert_eq!(simulator.rule().to_string(), "B3/S23");

    let mut simulator = Simulator::new("B3/S23".parse::<RuleSpace>()?);
    for x in 0..3 {
        simulator.set_cell(Coord::new(x, 0), ALIVE);
    }
    simulator.step();
    let vertical: Grid = "o$o$o!".parse()?;
    let mut expected = Grid::new();
    expected.insert_cells(&vertical, Coord::new(1, -1));
    assert_eq!(simulator.grid(), &expected);
    assert_eq!(simulator.cells_changed().len(), 4);

    simulator.clear_cells(Coord::new(-5, -5), Coord::new(5, 5));
    simulator.step();
    assert_eq!(simulator.population(), 0);
    assert_eq!(simulator.generation(), 2);
    Ok(())
}
