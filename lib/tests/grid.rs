use rand::{rngs::StdRng, Rng, SeedableRng};
use rcasim_lib::{
    Coord, Error as CaError, Grid, State, Symmetry, Transform, ALIVE, DEAD, MAX_STATES,
};
use std::error::Error;

const GLIDER: &str = "bob$2bo$3o!";

#[test]
fn rle() -> Result<(), Box<dyn Error>> {
    let glider: Grid = GLIDER.parse()?;
    assert_eq!(glider.population(), 5);
    assert_eq!(glider.get_cell(Coord::new(1, 0)), ALIVE);
    assert_eq!(glider.get_cell(Coord::new(0, 0)), DEAD);
    let rle = glider.to_rle(Coord::ORIGIN, Coord::new(2, 2));
    assert_eq!(rle, ".A.$2.A$3A!");
    assert_eq!(glider.to_string(), rle);
    assert_eq!(rle.parse::<Grid>()?, glider);

    let multi: Grid = "2A.C$B2.D!".parse()?;
    assert_eq!(multi.get_cell(Coord::new(3, 0)), State(3));
    assert_eq!(multi.get_cell(Coord::new(0, 1)), State(2));
    assert_eq!(multi.to_string().parse::<Grid>()?, multi);

    assert!(matches!("3o$x!".parse::<Grid>(), Err(CaError::InvalidRle(_))));
    Ok(())
}

#[test]
fn apgcode() -> Result<(), Box<dyn Error>> {
    let mut block = Grid::new();
    block.from_apgcode("xs4_33", Coord::ORIGIN)?;
    assert_eq!(block, "oo$oo!".parse()?);

    let mut glider = Grid::new();
    glider.from_apgcode("xq4_153", Coord::ORIGIN)?;
    assert_eq!(glider, "3o$2bo$bo!".parse()?);

    let mut grid = Grid::new();
    assert!(matches!(
        grid.from_apgcode("xs4", Coord::ORIGIN),
        Err(CaError::InvalidApgcode(_))
    ));
    Ok(())
}

#[test]
fn hash_and_equality() -> Result<(), Box<dyn Error>> {
    let glider: Grid = GLIDER.parse()?;
    let mut shifted = Grid::new();
    shifted.from_rle(GLIDER, Coord::new(10, -7))?;
    assert_eq!(glider.hash_code(), shifted.hash_code());
    assert!(glider.slow_equals(&shifted, Coord::new(10, -7)));
    assert!(!glider.slow_equals(&shifted, Coord::ORIGIN));
    assert!(!shifted.slow_equals(&glider, Coord::new(10, -7)));
    assert_ne!(glider, shifted);

    let horizontal: Grid = "3o!".parse()?;
    let vertical: Grid = "o$o$o!".parse()?;
    assert_ne!(horizontal.hash_code(), vertical.hash_code());
    assert!(!horizontal.slow_equals(&vertical, Coord::ORIGIN));
    Ok(())
}

#[test]
fn transforms() -> Result<(), Box<dyn Error>> {
    let mut grid: Grid = "oo$o!".parse()?;
    grid.reflect_x(Coord::ORIGIN, Coord::new(1, 1));
    assert_eq!(grid, "oo$bo!".parse()?);
    grid.reflect_y(Coord::ORIGIN, Coord::new(1, 1));
    assert_eq!(grid, "bo$oo!".parse()?);

    let mut blinker: Grid = "3o!".parse()?;
    blinker.transform(Transform::Rotate90, Coord::ORIGIN, Coord::new(2, 0));
    assert_eq!(blinker, "o$o$o!".parse()?);

    let glider: Grid = GLIDER.parse()?;
    let mut rotated = glider.clone();
    rotated.rotate_cw(Coord::ORIGIN, Coord::new(2, 2));
    assert_ne!(rotated, glider);
    rotated.rotate_ccw(Coord::ORIGIN, Coord::new(2, 2));
    assert_eq!(rotated, glider);

    let mut flipped = glider.clone();
    flipped.transform(Transform::FlipCol, Coord::ORIGIN, Coord::new(2, 2));
    let mut reflected = glider.clone();
    reflected.reflect_x(Coord::ORIGIN, Coord::new(2, 2));
    assert_eq!(flipped, reflected);
    Ok(())
}

#[test]
fn sub_grid_and_clear() -> Result<(), Box<dyn Error>> {
    let mut grid: Grid = "3o$3o$3o!".parse()?;
    let corner = grid.sub_grid(Coord::ORIGIN, Coord::new(1, 1));
    assert_eq!(corner, "oo$oo!".parse()?);
    grid.clear_cells(Coord::ORIGIN, Coord::new(1, 1));
    assert_eq!(grid.population(), 5);
    assert_eq!(grid.get_cell(Coord::new(1, 1)), DEAD);
    grid.insert_cells(&corner, Coord::ORIGIN);
    assert_eq!(grid.population(), 9);
    grid.update_bounds();
    assert_eq!(grid.bounds(), (Coord::ORIGIN, Coord::new(2, 2)));
    grid.clear();
    assert!(grid.is_empty());
    assert_eq!(grid.bounds(), (Coord::ORIGIN, Coord::ORIGIN));
    Ok(())
}

#[test]
fn background() -> Result<(), Box<dyn Error>> {
    let mut grid: Grid = "o!".parse()?;
    grid.set_background(ALIVE);
    assert_eq!(grid.get_cell(Coord::new(0, 0)), DEAD);
    assert_eq!(grid.get_cell(Coord::new(5, 5)), ALIVE);
    grid.set_cell(Coord::new(5, 5), ALIVE);
    assert_eq!(grid.population(), 1);
    Ok(())
}

#[test]
fn population_matches_recount() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut grid = Grid::new();
    for _ in 0..2000 {
        let coord = Coord::new(rng.gen_range(-20..20), rng.gen_range(-20..20));
        let state = State(rng.gen_range(0..3));
        grid.set_cell(coord, state);
    }
    let recount = (-20..20)
        .flat_map(|x| (-20..20).map(move |y| Coord::new(x, y)))
        .filter(|&coord| grid.get_cell(coord) != DEAD)
        .count();
    assert_eq!(grid.population(), recount);
    assert_eq!(grid.cells().count(), recount);
}

#[test]
fn soups() -> Result<(), Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(2020);

    let soup = Grid::soup(16, 16, 50, &[ALIVE], Symmetry::C1, &mut rng)?;
    assert!(soup.population() > 0 && soup.population() < 256);

    let full = Grid::soup(8, 4, 100, &[State(2)], Symmetry::C1, &mut rng)?;
    assert_eq!(full.population(), 32);
    assert!(full.cells().all(|(_, state)| state == State(2)));

    let symmetric = Grid::soup(16, 16, 50, &[ALIVE], Symmetry::D2Col, &mut rng)?;
    let mut reflected = symmetric.clone();
    reflected.reflect_x(Coord::ORIGIN, Coord::new(15, 15));
    assert_eq!(reflected, symmetric);

    assert_eq!(
        Grid::soup(16, 8, 50, &[ALIVE], Symmetry::C4, &mut rng),
        Err(CaError::SquareSoupError)
    );
    assert_eq!(
        Grid::soup(16, 16, 101, &[ALIVE], Symmetry::C1, &mut rng),
        Err(CaError::InvalidDensity(101))
    );
    assert_eq!(
        Grid::soup(0, 16, 50, &[ALIVE], Symmetry::C1, &mut rng),
        Err(CaError::NonPositiveError)
    );
    assert_eq!("D2|".parse::<Symmetry>()?, Symmetry::D2Col);
    Ok(())
}

#[test]
fn many_states() -> Result<(), Box<dyn Error>> {
    let mut grid = Grid::new();
    for (x, &state) in [1, 24, 25, 27, 34, 47, 48, 49, 200, 255].iter().enumerate() {
        grid.set_cell(Coord::new(x as i32, 0), State(state));
    }
    let rle = grid.to_string();
    assert!(rle.starts_with("AXpApCpJpWpXqA"));
    assert!(rle.ends_with("yO!"));
    assert_eq!(rle.parse::<Grid>()?, grid);

    let mut too_many = Grid::new();
    too_many.set_cell(Coord::ORIGIN, State(MAX_STATES));
    assert_eq!(too_many.to_string(), "?!");
    assert!(too_many.to_string().parse::<Grid>().is_err());
    Ok(())
}

#[test]
fn huge_runs() {
    for rle in ["2147483647b2147483647b2o!", "2147483647$2147483647$o!"].iter() {
        assert!(matches!(rle.parse::<Grid>(), Err(CaError::InvalidRle(_))));
    }
}

#[test]
fn random_round_trips() -> Result<(), Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(1234);
    for _ in 0..50 {
        let mut grid = Grid::new();
        for _ in 0..rng.gen_range(1..60) {
            let coord = Coord::new(rng.gen_range(-12..12), rng.gen_range(-12..12));
            grid.set_cell(coord, State(rng.gen_range(1..40)));
        }
        grid.update_bounds();
        let (start, _) = grid.bounds();
        let mut decoded = Grid::new();
        decoded.from_rle(&grid.to_string(), start)?;
        assert_eq!(decoded, grid);

        let offset = Coord::new(rng.gen_range(-100..100), rng.gen_range(-100..100));
        let mut shifted = Grid::new();
        shifted.insert_cells(&grid, offset);
        assert_eq!(shifted.hash_code(), grid.hash_code());
        assert!(grid.slow_equals(&shifted, offset));
        assert_eq!(shifted.population(), grid.population());
    }
    Ok(())
}
