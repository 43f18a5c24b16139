//! Destructible obstacles built from small square blocks
//!
//! An obstacle is a row of columns; a column is a bottom-up stack of blocks
//! where a cleared slot is `None`. Splash damage carves blocks out, then a
//! staggered per-column gravity animation drops the survivors until no block
//! hangs over an empty slot. Collapse is column-local, so one settle tick
//! costs O(columns x column height).

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::projectile::Projectile;
use crate::consts::{BLOCK_SIZE, FIELD_HEIGHT};
use crate::render::{Color, DrawSurface};

/// One vertical slice of an obstacle.
#[derive(Debug, Clone)]
pub struct Column {
    /// Blocks bottom-up; `None` is a cleared slot
    blocks: Vec<Option<Color>>,
    x_pos: f32,
    x_center: f32,
    /// Ground line the column stands on
    y_pos: f32,
    animating: bool,
    /// Ticks since the last splash damaged this column
    animation_time: u32,
}

impl Column {
    fn new(x_pos: f32, y_pos: f32, blocks: Vec<Option<Color>>) -> Self {
        Self {
            blocks,
            x_pos,
            x_center: x_pos + BLOCK_SIZE / 2.0,
            y_pos,
            animating: false,
            animation_time: 0,
        }
    }

    /// True while some block still has to fall.
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    fn block_center(&self, i: usize) -> Vec2 {
        Vec2::new(self.x_center, self.y_pos - (i as f32 + 0.5) * BLOCK_SIZE)
    }

    /// Direct-hit test: x-span rejection first, then a per-block center
    /// distance check against the shell radius.
    pub fn is_collision(&self, p: &Projectile) -> bool {
        if p.x_pos() + p.radius() < self.x_pos
            || p.x_pos() - p.radius() > self.x_pos + BLOCK_SIZE
        {
            return false;
        }
        self.blocks.iter().enumerate().any(|(i, block)| {
            block.is_some()
                && self.block_center(i).distance(p.position()) < p.radius() + BLOCK_SIZE
        })
    }

    /// Clears every block inside the blast and restarts the fall animation.
    pub fn apply_splash(&mut self, p: &Projectile) {
        if p.x_pos() + p.explosion_radius() < self.x_pos
            || p.x_pos() - p.explosion_radius() > self.x_pos + BLOCK_SIZE
        {
            return;
        }
        let reach = p.explosion_radius() / 2.0 + BLOCK_SIZE * 1.5;
        for i in 0..self.blocks.len() {
            if self.blocks[i].is_some() && self.block_center(i).distance(p.position()) < reach {
                self.blocks[i] = None;
                self.animating = true;
                self.animation_time = 0;
            }
        }
        self.check_consistency();
    }

    /// Advances the fall animation one tick. Blocks shift down one slot on
    /// the staggered schedule (ticks 6, 10 and every tick from 12 on), which
    /// reads as a fall rather than an instant disappearance.
    pub fn animate(&mut self) {
        if self.is_shift_tick() {
            let mut gap_found = false;
            for i in 0..self.blocks.len() {
                if self.blocks[i].is_none() {
                    gap_found = true;
                } else if gap_found {
                    self.blocks[i - 1] = self.blocks[i].take();
                }
            }
        }
        self.animation_time += 1;
        self.check_consistency();
    }

    fn is_shift_tick(&self) -> bool {
        self.animation_time == 6 || self.animation_time == 10 || self.animation_time >= 12
    }

    /// Trims cleared slots off the top, then re-checks whether any interior
    /// gap remains (a block above a gap still has to fall).
    fn check_consistency(&mut self) {
        while self.blocks.last() == Some(&None) {
            self.blocks.pop();
        }
        self.animating = self.blocks.iter().any(Option::is_none);
    }

    pub fn render(&self, surface: &mut dyn DrawSurface, ratio: f32) {
        for (i, block) in self.blocks.iter().enumerate() {
            if let Some(color) = block {
                surface.fill_rect(
                    self.x_pos * ratio,
                    (self.y_pos - (i as f32 + 1.0) * BLOCK_SIZE) * ratio,
                    BLOCK_SIZE * ratio,
                    BLOCK_SIZE * ratio,
                    *color,
                );
            }
        }
    }

    #[cfg(test)]
    fn blocks(&self) -> &[Option<Color>] {
        &self.blocks
    }
}

/// A destructible obstacle: columns standing side by side on the ground.
#[derive(Debug, Clone)]
pub struct Obstacle {
    columns: Vec<Column>,
    x_pos: f32,
    y_pos: f32,
    /// Tallest initial column, for the bounding-box pre-check
    highest: usize,
}

impl Obstacle {
    /// Builds an obstacle from a column-major grid (bottom-up within each
    /// column), left edge at `x_pos`, standing on `y_pos`.
    pub fn new(x_pos: f32, y_pos: f32, grid: Vec<Vec<Option<Color>>>) -> Self {
        let highest = grid.iter().map(Vec::len).max().unwrap_or(0);
        let columns = grid
            .into_iter()
            .enumerate()
            .map(|(i, blocks)| Column::new(x_pos + i as f32 * BLOCK_SIZE, y_pos, blocks))
            .collect();
        Self {
            columns,
            x_pos,
            y_pos,
            highest,
        }
    }

    /// Builds a random template centered on `x_center`.
    pub fn random(x_center: f32, ground_y: f32, rng: &mut Pcg32) -> Self {
        let grid = match rng.random_range(0..2) {
            0 => templates::house(rng),
            _ => templates::factory(rng),
        };
        let x_left = x_center - grid.len() as f32 * BLOCK_SIZE / 2.0;
        Self::new(x_left, ground_y, grid)
    }

    /// Remaining column count; zero means the obstacle is destroyed.
    pub fn columns_count(&self) -> usize {
        self.columns.len()
    }

    /// Horizontal span of the remaining columns
    pub fn x_span(&self) -> (f32, f32) {
        (
            self.x_pos,
            self.x_pos + self.columns.len() as f32 * BLOCK_SIZE,
        )
    }

    pub fn is_animating(&self) -> bool {
        self.columns.iter().any(Column::is_animating)
    }

    /// Direct-hit test with a bounding-box rejection before the columns are
    /// consulted. The y bound uses the tallest initial column.
    pub fn is_collision(&self, p: &Projectile) -> bool {
        if p.x_pos() + p.radius() < self.x_pos
            || p.x_pos() - p.radius() > self.x_span().1
            || p.y_pos() + p.radius() < FIELD_HEIGHT - self.highest as f32 * BLOCK_SIZE
        {
            return false;
        }
        self.columns.iter().any(|c| c.is_collision(p))
    }

    /// Forwards an explosion to every column (after a bounding-box check
    /// widened by the blast radius).
    pub fn apply_splash(&mut self, p: &Projectile) {
        if p.x_pos() + p.explosion_radius() < self.x_pos
            || p.x_pos() - p.explosion_radius() > self.x_span().1
            || p.y_pos() + p.explosion_radius() < FIELD_HEIGHT - self.highest as f32 * BLOCK_SIZE
        {
            return;
        }
        for column in &mut self.columns {
            column.apply_splash(p);
        }
    }

    /// Advances every column's fall animation one tick, then trims emptied
    /// margin columns so the obstacle's effective footprint shrinks.
    pub fn animate(&mut self) {
        for column in &mut self.columns {
            column.animate();
        }
        self.filter_margin_columns();
    }

    fn filter_margin_columns(&mut self) {
        while self.columns.first().is_some_and(Column::is_empty) {
            self.columns.remove(0);
            self.x_pos += BLOCK_SIZE;
        }
        while self.columns.last().is_some_and(Column::is_empty) {
            self.columns.pop();
        }
    }

    pub fn render(&self, surface: &mut dyn DrawSurface, ratio: f32) {
        for column in &self.columns {
            column.render(surface, ratio);
        }
    }
}

/// The closed set of obstacle layouts. Column-major grids, bottom-up.
mod templates {
    use super::*;

    const WALLS: [Color; 4] = [
        Color::rgb(0x22, 0x22, 0x22),
        Color::rgb(0x33, 0x33, 0x33),
        Color::rgb(0x44, 0x44, 0x44),
        Color::rgb(0x55, 0x55, 0x55),
    ];
    const DOORS: [Color; 2] = [Color::rgb(0x8e, 0x35, 0x0b), Color::rgb(0xac, 0x55, 0x2f)];
    const ROOFS: [Color; 2] = [Color::rgb(0x98, 0x1f, 0x1f), Color::RED];
    const GLASS: Color = Color::LIGHT_BLUE;

    fn pick(palette: &[Color], rng: &mut Pcg32) -> Color {
        palette[rng.random_range(0..palette.len())]
    }

    /// A 22-column house: door on the left, two window bands, tapered roof.
    pub fn house(rng: &mut Pcg32) -> Vec<Vec<Option<Color>>> {
        let wall = pick(&WALLS, rng);
        let door = pick(&DOORS, rng);
        let roof = pick(&ROOFS, rng);
        const COLS: usize = 22;
        const WALL_ROWS: usize = 14;

        (0..COLS)
            .map(|col| {
                let mut blocks = Vec::with_capacity(WALL_ROWS + 3);
                let window_col = matches!(col, 3..=5 | 9..=11 | 15..=17);
                let door_col = (1..=5).contains(&col);
                for row in 0..WALL_ROWS {
                    let cell = if door_col && (1..=5).contains(&row) {
                        door
                    } else if window_col && matches!(row, 7..=9 | 11..=13) {
                        GLASS
                    } else {
                        wall
                    };
                    blocks.push(Some(cell));
                }
                // Roof tapers toward the gable ends
                let roof_rows = 3.min(col + 1).min(COLS - col);
                for _ in 0..roof_rows {
                    blocks.push(Some(roof));
                }
                blocks
            })
            .collect()
    }

    /// A 39-column factory hall with two tall chimneys and an annex.
    pub fn factory(rng: &mut Pcg32) -> Vec<Vec<Option<Color>>> {
        let wall = pick(&WALLS, rng);
        let door = pick(&DOORS, rng);
        let roof = pick(&ROOFS, rng);
        let detail = Color::BLACK;
        const COLS: usize = 39;
        const HALL_ROWS: usize = 15;
        const CHIMNEY_ROWS: usize = 29;

        (0..COLS)
            .map(|col| {
                let chimney = matches!(col, 6..=8 | 12..=14);
                let annex = col >= 26;
                let mut blocks = Vec::with_capacity(CHIMNEY_ROWS);
                for row in 0..HALL_ROWS {
                    let cell = if annex {
                        if (0..=6).contains(&row) && col < 37 {
                            door
                        } else if matches!(row, 8..=9) && (30..=33).contains(&col) {
                            GLASS
                        } else {
                            wall
                        }
                    } else if col == 4 {
                        detail
                    } else if matches!(row, 2..=3 | 5..=6 | 8..=9 | 11..=12) && col >= 5 && col < 26
                    {
                        GLASS
                    } else {
                        wall
                    };
                    blocks.push(Some(cell));
                }
                if chimney {
                    for _ in HALL_ROWS..CHIMNEY_ROWS {
                        blocks.push(Some(detail));
                    }
                } else if annex {
                    let roof_rows = 3.min(COLS - col);
                    for _ in 0..roof_rows {
                        blocks.push(Some(roof));
                    }
                }
                blocks
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::projectile::ProjectileStats;
    use proptest::prelude::*;
    use rand::SeedableRng;

    const W: Color = Color::rgb(0x33, 0x33, 0x33);

    fn shell_at(x: f32, y: f32, explosion_radius: f32) -> Projectile {
        let stats = ProjectileStats {
            radius: 2.0,
            speed: 1.0,
            explosion_radius,
            damage: 11,
            mass: 5.0,
        };
        let mut p = Projectile::new(1, stats, 0.0);
        p.launch(Vec2::new(x, y), 0.0, 10.0);
        p
    }

    fn solid_column(x: f32, height: usize) -> Column {
        Column::new(x, 300.0, vec![Some(W); height])
    }

    fn settle(column: &mut Column) {
        for _ in 0..200 {
            column.animate();
        }
    }

    #[test]
    fn test_column_direct_hit_requires_block_proximity() {
        let column = solid_column(100.0, 10);
        // Right next to the column's top block
        assert!(column.is_collision(&shell_at(101.5, 272.0, 25.0)));
        // Same x, far above the stack
        assert!(!column.is_collision(&shell_at(101.5, 100.0, 25.0)));
        // Outside the x-span
        assert!(!column.is_collision(&shell_at(150.0, 272.0, 25.0)));
    }

    #[test]
    fn test_splash_carves_and_starts_animation() {
        let mut column = solid_column(100.0, 20);
        // Blast centered midway up the stack
        column.apply_splash(&shell_at(101.5, 270.0, 25.0));
        assert!(column.is_animating());
        assert!(column.blocks().iter().any(Option::is_none));
        // Blocks above and below the carved band survive
        assert!(column.blocks().first().unwrap().is_some());
        assert!(column.blocks().last().unwrap().is_some());
    }

    #[test]
    fn test_column_settles_to_consistent_state() {
        let mut column = solid_column(100.0, 20);
        column.apply_splash(&shell_at(101.5, 270.0, 25.0));
        settle(&mut column);

        assert!(!column.is_animating());
        // No empty slot below a present block
        assert!(column.blocks().iter().all(Option::is_some));

        // Further ticks are idempotent
        let before = column.blocks().to_vec();
        for _ in 0..20 {
            column.animate();
        }
        assert_eq!(column.blocks(), &before[..]);
        assert!(!column.is_animating());
    }

    #[test]
    fn test_first_shift_happens_on_tick_six() {
        let mut column = Column::new(100.0, 300.0, vec![None, Some(W)]);
        column.animating = true;
        // Ticks 0..=5 leave the gap in place
        for _ in 0..6 {
            column.animate();
            assert!(column.blocks()[0].is_none());
        }
        // The tick where the counter reads 6 performs the first shift
        column.animate();
        assert_eq!(column.blocks(), &[Some(W)]);
        assert!(!column.is_animating());
    }

    #[test]
    fn test_obstacle_margin_trim_recenters() {
        // Three columns; the blast clears the leftmost one entirely
        let grid = vec![vec![Some(W); 2], vec![Some(W); 8], vec![Some(W); 8]];
        let mut obstacle = Obstacle::new(100.0, 300.0, grid);
        obstacle.apply_splash(&shell_at(101.5, 297.0, 25.0));
        for _ in 0..200 {
            obstacle.animate();
        }

        assert_eq!(obstacle.columns_count(), 2);
        assert_eq!(obstacle.x_span().0, 100.0 + BLOCK_SIZE);
    }

    #[test]
    fn test_obstacle_bbox_prefilters_collision() {
        let grid = vec![vec![Some(W); 8]; 4];
        let obstacle = Obstacle::new(100.0, 300.0, grid);
        // Far to the side and far above: rejected by the box alone
        assert!(!obstacle.is_collision(&shell_at(400.0, 290.0, 25.0)));
        assert!(!obstacle.is_collision(&shell_at(105.0, 50.0, 25.0)));
        // Inside the stack
        assert!(obstacle.is_collision(&shell_at(105.0, 295.0, 25.0)));
    }

    proptest! {
        /// Any single blast into a solid column settles to a stack with no
        /// interior gap, whatever the blast height and radius.
        #[test]
        fn prop_collapse_settles_without_interior_gaps(
            height in 1usize..30,
            shot_y in 230.0_f32..300.0,
            explosion_radius in 10.0_f32..40.0,
        ) {
            let mut column = solid_column(100.0, height);
            column.apply_splash(&shell_at(101.5, shot_y, explosion_radius));
            for _ in 0..300 {
                column.animate();
            }
            prop_assert!(!column.is_animating());
            prop_assert!(column.blocks().iter().all(Option::is_some));
        }
    }

    #[test]
    fn test_templates_have_expected_footprint() {
        let mut rng = Pcg32::seed_from_u64(42);
        let house = Obstacle::random(400.0, 300.0, &mut rng);
        let (left, right) = house.x_span();
        // Centered on 400 regardless of which template was drawn
        assert!((left + right - 800.0).abs() < 1e-3);
        assert!(house.columns_count() >= 22);
        assert!(!house.is_animating());
    }
}
