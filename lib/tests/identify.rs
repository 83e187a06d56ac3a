use rcasim_lib::{
    rules::{MinMax, RuleSpace},
    Config, Coord, Error as CaError, PatternKind, Simulator, ALIVE,
};
use std::error::Error;

fn load(rule: &str, rle: &str) -> Result<Simulator, Box<dyn Error>> {
    Ok(Simulator::with_grid(rule.parse()?, rle.parse()?))
}

#[test]
fn glider() -> Result<(), Box<dyn Error>> {
    let config = Config::new("B3/S23", "bob$2bo$3o!").set_max_period(10);
    let pattern = config.identify()?.ok_or("not identified")?;
    assert_eq!(
        *pattern.kind(),
        PatternKind::Spaceship {
            period: 4,
            dx: 1,
            dy: 1
        }
    );
    assert_eq!(pattern.name(), "(1,1)c/4");
    assert_eq!(pattern.kind().displacement(), Coord::new(1, 1));
    assert_eq!(pattern.first_generation(), 0);
    assert_eq!(pattern.grid().population(), 5);

    let (min, max) = pattern.min_max().ok_or("no min / max rules")?;
    assert!(pattern.rule().between_min_max(min, max)?);
    assert_eq!(min.to_string(), "B3/S23");
    Ok(())
}

#[test]
fn lwss() -> Result<(), Box<dyn Error>> {
    let mut simulator = load("B3/S23", "bo2bo$o4b$o3bo$4o!")?;
    let pattern = simulator.identify(10, |_| true)?.ok_or("not identified")?;
    match *pattern.kind() {
        PatternKind::Spaceship { period, dx, dy } => {
            assert_eq!(period, 4);
            assert_eq!(dx.abs(), 2);
            assert_eq!(dy, 0);
        }
        ref kind => panic!("not a spaceship: {:?}", kind),
    }
    Ok(())
}

#[test]
fn still_life() -> Result<(), Box<dyn Error>> {
    let mut simulator = load("B3/S23", "oo$oo!")?;
    let pattern = simulator.identify(10, |_| true)?.ok_or("not identified")?;
    assert_eq!(*pattern.kind(), PatternKind::StillLife);
    assert_eq!(pattern.name(), "Still Life");
    assert_eq!(simulator.generation(), 1);

    let (min, max) = pattern.min_max().ok_or("no min / max rules")?;
    let rule = pattern.rule();
    assert!(rule.between_min_max(min, max)?);
    assert!(min.between_min_max(min, max)?);
    Ok(())
}

#[test]
fn oscillators() -> Result<(), Box<dyn Error>> {
    let mut simulator = load("B3/S23", "3o!")?;
    let pattern = simulator.identify(10, |_| true)?.ok_or("not identified")?;
    assert_eq!(*pattern.kind(), PatternKind::Oscillator { period: 2 });
    assert_eq!(pattern.name(), "P2 Oscillator");
    assert_eq!(pattern.kind().period(), Some(2));

    // The toad, starting a few generations late.
    let mut simulator = load("B3/S23", "b3o$3o!")?;
    simulator.step_by(3);
    let pattern = simulator.identify(10, |_| true)?.ok_or("not identified")?;
    assert_eq!(*pattern.kind(), PatternKind::Oscillator { period: 2 });
    assert_eq!(pattern.first_generation(), 3);
    Ok(())
}

#[test]
fn unsupported_min_max() -> Result<(), Box<dyn Error>> {
    let mut simulator = load("B3/S23|B3/S23", "3o!")?;
    let pattern = simulator.identify(10, |_| true)?.ok_or("not identified")?;
    assert_eq!(*pattern.kind(), PatternKind::Oscillator { period: 2 });
    assert!(pattern.min_max().is_none());
    Ok(())
}

#[test]
fn b0_oscillator() -> Result<(), Box<dyn Error>> {
    // The block, in the black and white reversal of Life.
    let rule: RuleSpace = "B0123478/S01234678".parse()?;
    let mut simulator = Simulator::with_grid(rule, "oo$oo!".parse()?);
    let pattern = simulator.identify(10, |_| true)?.ok_or("not identified")?;
    assert_eq!(*pattern.kind(), PatternKind::StillLife);
    assert_eq!(pattern.first_generation(), 0);
    assert_eq!(simulator.generation(), 1);
    assert_eq!(simulator.background(), ALIVE);
    assert_eq!(simulator.population(), 4);
    Ok(())
}

#[test]
fn linear_growth() -> Result<(), Box<dyn Error>> {
    // One new cell in every generation.
    let mut simulator = load("W4", "o!")?;
    let pattern = simulator.identify(60, |_| true)?.ok_or("not identified")?;
    assert_eq!(
        *pattern.kind(),
        PatternKind::LinearGrowth {
            period: 1,
            rate: 1.0
        }
    );
    assert_eq!(pattern.name(), "Linear Growth");
    assert!(pattern.min_max().is_none());
    Ok(())
}

#[test]
fn power_law() -> Result<(), Box<dyn Error>> {
    // Cells never die, so the population grows with the area.
    let mut simulator = load("B1/S012345678", "o!")?;
    let pattern = simulator.identify(100, |_| true)?.ok_or("not identified")?;
    match *pattern.kind() {
        PatternKind::PowerLaw { exponent } => assert!(exponent > 2.8 && exponent < 3.1),
        ref kind => panic!("not a power law: {:?}", kind),
    }
    assert_eq!(pattern.name(), "zz_QUADRATIC");
    assert_eq!(pattern.kind().period(), None);
    assert_eq!(simulator.generation(), 100);
    Ok(())
}

#[test]
fn unidentified() -> Result<(), Box<dyn Error>> {
    let mut simulator = load("W4", "o!")?;
    assert!(simulator.identify(3, |_| true)?.is_none());
    assert_eq!(simulator.generation(), 3);

    let mut simulator = load("B3/S23", "bob$2bo$3o!")?;
    assert!(simulator.identify(3, |_| true)?.is_none());
    Ok(())
}

#[test]
fn cancellation() -> Result<(), Box<dyn Error>> {
    let mut simulator = load("B3/S23", "bob$2bo$3o!")?;
    let mut calls = 0;
    let result = simulator.identify(100, |grid| {
        calls += 1;
        grid.population() < 5
    })?;
    assert!(result.is_none());
    assert_eq!(calls, 1);

    let mut simulator = load("B3/S23", "oo$oo!")?;
    assert_eq!(
        simulator.identify(0, |_| true).err(),
        Some(CaError::NonPositiveError)
    );
    Ok(())
}
