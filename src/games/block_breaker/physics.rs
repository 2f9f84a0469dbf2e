//! One fixed-step frame of Block Breaker.

use rand::Rng;

use super::state::*;

/// What a frame did to the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    /// Every ball fell out; a fresh one was served.
    LifeLost,
    /// Every ball fell out on the last life.
    Lost,
    /// The last block was destroyed.
    Won,
}

/// Steering for one frame, already in world units.
#[derive(Debug, Clone, Copy, Default)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    /// Set when the pointer moved this frame.
    pub pointer_x: Option<f32>,
}

/// Which faces of a block the ball came through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitSide {
    /// Left or right face: dx flips.
    Vertical,
    /// Top or bottom face: dy flips.
    Horizontal,
    /// No face was clear of the ball last frame: both flip.
    Corner,
}

pub fn step(session: &mut Session, controls: &Controls) -> StepOutcome {
    steer_paddle(session, controls);

    let mut outcome = StepOutcome::Continue;
    if advance_balls(session) {
        outcome = lose_life(session);
        if outcome == StepOutcome::Lost {
            return outcome;
        }
    }

    if collide(session) && session.all_cleared() {
        tracing::info!(score = session.score, "all blocks cleared");
        return StepOutcome::Won;
    }

    update_powerups(session);
    update_timers(session);
    outcome
}

fn steer_paddle(session: &mut Session, controls: &Controls) {
    if let Some(x) = controls.pointer_x {
        session.pointer_x = x;
        session.use_pointer = true;
    }

    let paddle = &mut session.paddle;
    if session.use_pointer {
        paddle.x = session.pointer_x - paddle.width / 2.0;
    } else {
        let speed = session.settings.paddle_speed;
        if controls.left {
            paddle.x -= speed;
        }
        if controls.right {
            paddle.x += speed;
        }
    }
    if controls.left || controls.right {
        session.use_pointer = false;
    }
    paddle.x = paddle.x.clamp(0.0, WIDTH - paddle.width);
}

/// Move every ball and drop the ones past the bottom edge. Returns true
/// when none are left.
fn advance_balls(session: &mut Session) -> bool {
    let m = session.speed_modifier;
    for ball in &mut session.balls {
        ball.record_trail();
        ball.prev_x = ball.x;
        ball.prev_y = ball.y;
        ball.x += ball.dx * m;
        ball.y += ball.dy * m;
        bounce_walls(ball);
    }
    session.balls.retain(|b| b.y < HEIGHT);
    session.balls.is_empty()
}

/// Reflect off the side and top walls. The bottom is open.
pub fn bounce_walls(ball: &mut Ball) {
    if ball.x <= 0.0 || ball.x >= WIDTH - BALL_SIZE {
        ball.dx = -ball.dx;
        ball.x = ball.x.clamp(0.0, WIDTH - BALL_SIZE);
    }
    if ball.y <= 0.0 {
        ball.dy = -ball.dy;
        ball.y = 0.0;
    }
}

fn lose_life(session: &mut Session) -> StepOutcome {
    session.lives = session.lives.saturating_sub(1);
    if session.lives == 0 {
        tracing::info!(score = session.score, "out of lives");
        return StepOutcome::Lost;
    }
    tracing::info!(lives = session.lives, "ball lost");
    session.serve();
    StepOutcome::LifeLost
}

/// Send a descending ball back up at an angle set by where it struck the
/// paddle. Returns false when the ball isn't on the paddle.
pub fn deflect_off_paddle(ball: &mut Ball, paddle: &Paddle) -> bool {
    if ball.dy <= 0.0 || !ball.bounds().touches(&paddle.bounds()) {
        return false;
    }
    let half = paddle.width / 2.0;
    let offset = ((ball.x + BALL_SIZE / 2.0 - paddle.center()) / half).clamp(-1.0, 1.0);
    let angle = (offset * PADDLE_MAX_ANGLE_DEG).to_radians();

    ball.dx = BASE_SPEED * angle.sin();
    ball.dy = -BASE_SPEED * angle.cos();
    if ball.dy.abs() < MIN_VERTICAL_SPEED {
        ball.dy = if ball.dy < 0.0 { -MIN_VERTICAL_SPEED } else { MIN_VERTICAL_SPEED };
    }
    ball.y = PADDLE_Y - BALL_SIZE;
    true
}

/// Classify a block hit from where the ball's box was last frame.
pub fn hit_side(prev: &Bounds, block: &Bounds) -> HitSide {
    let from_left = prev.right() <= block.x;
    let from_right = prev.x >= block.right();
    let from_top = prev.bottom() <= block.y;
    let from_bottom = prev.y >= block.bottom();

    if from_left || from_right {
        HitSide::Vertical
    } else if from_top || from_bottom {
        HitSide::Horizontal
    } else {
        HitSide::Corner
    }
}

/// Paddle and block contacts for every ball. Returns true when any block
/// was destroyed.
fn collide(session: &mut Session) -> bool {
    let Session {
        balls,
        paddle,
        blocks,
        powerups,
        score,
        ..
    } = session;

    let mut any_hit = false;
    for ball in balls.iter_mut() {
        deflect_off_paddle(ball, paddle);

        let bounds = ball.bounds();
        let Some(block) = blocks
            .iter_mut()
            .find(|b| b.visible && bounds.overlaps(&b.bounds()))
        else {
            continue;
        };

        block.visible = false;
        *score += block.points;
        if let Some(kind) = block.powerup {
            powerups.push(Powerup::from_block(block, kind));
        }
        tracing::debug!(row = block.row, col = block.col, points = block.points, "block hit");

        match hit_side(&ball.prev_bounds(), &block.bounds()) {
            HitSide::Vertical => ball.dx = -ball.dx,
            HitSide::Horizontal => ball.dy = -ball.dy,
            HitSide::Corner => {
                ball.dx = -ball.dx;
                ball.dy = -ball.dy;
            }
        }
        any_hit = true;
    }
    any_hit
}

fn update_powerups(session: &mut Session) {
    let paddle = session.paddle.bounds();
    let mut caught = Vec::new();
    session.powerups.retain_mut(|p| {
        p.y += POWERUP_SPEED;
        if p.bounds().touches(&paddle) {
            caught.push(p.kind);
            false
        } else {
            p.y <= HEIGHT
        }
    });
    for kind in caught {
        apply_powerup(session, kind);
    }
}

pub fn apply_powerup(session: &mut Session, kind: PowerupKind) {
    tracing::info!(powerup = kind.name(), "powerup caught");
    let frames = session.settings.powerup_frames;
    match kind {
        PowerupKind::Expand => {
            session.paddle.width = PADDLE_WIDTH * EXPAND_FACTOR;
            session.expand_timer.start(frames);
        }
        PowerupKind::Multi => {
            let Some(origin) = session.balls.first() else {
                return;
            };
            let (x, y) = (origin.x, origin.y);
            for _ in 0..2 {
                let angle = session.rng.gen_range(-MULTI_SPREAD_DEG..=MULTI_SPREAD_DEG);
                session.balls.push(Ball::launched(x, y, angle));
            }
        }
        PowerupKind::Slow => {
            session.speed_modifier = SLOW_MODIFIER;
            session.speed_timer.start(frames);
        }
        PowerupKind::Fast => {
            session.speed_modifier = FAST_MODIFIER;
            session.speed_timer.start(frames);
        }
    }
}

fn update_timers(session: &mut Session) {
    if session.expand_timer.tick() {
        session.paddle.width = PADDLE_WIDTH;
    }
    if session.speed_timer.tick() {
        session.speed_modifier = 1.0;
        for ball in &mut session.balls {
            renormalize(ball);
        }
    }
}

/// Snap each velocity component back to base speed, keeping its sign.
/// The angle is not preserved.
pub fn renormalize(ball: &mut Ball) {
    if ball.speed() == 0.0 {
        return;
    }
    ball.dx = if ball.dx != 0.0 { ball.dx.signum() * BASE_SPEED } else { 0.0 };
    ball.dy = if ball.dy != 0.0 { ball.dy.signum() * BASE_SPEED } else { -BASE_SPEED };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BlockBreakerConfig;
    use proptest::prelude::*;

    fn quiet() -> BlockBreakerConfig {
        BlockBreakerConfig {
            powerup_chance: 0.0,
            ..Default::default()
        }
    }

    fn session() -> Session {
        let mut s = Session::new(quiet(), 42);
        s.use_pointer = false;
        s
    }

    fn park(s: &mut Session, ball: Ball) {
        s.balls = vec![ball];
    }

    #[test]
    fn left_wall_bounce_flips_dx() {
        let mut ball = Ball::with_velocity(-5.0, 300.0, -5.0, 0.0);
        bounce_walls(&mut ball);
        assert_eq!(ball.dx, 5.0);
        assert_eq!(ball.x, 0.0);
    }

    #[test]
    fn straight_ball_bounces_off_left_wall_in_a_step() {
        let mut s = session();
        park(&mut s, Ball::with_velocity(3.0, 300.0, -5.0, -1.0));
        step(&mut s, &Controls::default());
        assert_eq!(s.balls[0].dx, 5.0);
        assert_eq!(s.balls[0].x, 0.0);
    }

    #[test]
    fn top_wall_clamps_to_zero() {
        let mut ball = Ball::with_velocity(100.0, -3.0, 1.0, -4.0);
        bounce_walls(&mut ball);
        assert_eq!(ball.dy, 4.0);
        assert_eq!(ball.y, 0.0);
    }

    #[test]
    fn ball_past_bottom_costs_a_life_and_reserves() {
        let mut s = session();
        park(&mut s, Ball::with_velocity(20.0, HEIGHT - 1.0, 0.0, 5.0));
        assert_eq!(step(&mut s, &Controls::default()), StepOutcome::LifeLost);
        assert_eq!(s.lives, 2);
        assert_eq!(s.balls.len(), 1);
        assert_eq!((s.balls[0].x, s.balls[0].y), (250.0, 540.0));
    }

    #[test]
    fn last_life_loses_the_round() {
        let mut s = session();
        s.lives = 1;
        park(&mut s, Ball::with_velocity(20.0, HEIGHT - 1.0, 0.0, 5.0));
        assert_eq!(step(&mut s, &Controls::default()), StepOutcome::Lost);
        assert_eq!(s.lives, 0);
    }

    #[test]
    fn one_of_several_balls_falling_is_free() {
        let mut s = session();
        s.balls = vec![
            Ball::with_velocity(20.0, HEIGHT - 1.0, 0.0, 5.0),
            Ball::with_velocity(200.0, 300.0, 0.0, -5.0),
        ];
        assert_eq!(step(&mut s, &Controls::default()), StepOutcome::Continue);
        assert_eq!(s.lives, 3);
        assert_eq!(s.balls.len(), 1);
    }

    #[test]
    fn paddle_center_hit_goes_straight_up() {
        let paddle = Paddle::centered();
        let mut ball = Ball::with_velocity(paddle.center() - BALL_SIZE / 2.0, PADDLE_Y - 5.0, 1.0, 5.0);
        assert!(deflect_off_paddle(&mut ball, &paddle));
        assert!(ball.dx.abs() < 1e-4);
        assert!((ball.dy + BASE_SPEED).abs() < 1e-4);
        assert_eq!(ball.y, PADDLE_Y - BALL_SIZE);
    }

    #[test]
    fn paddle_edge_hit_angles_outward() {
        let paddle = Paddle::centered();
        let mut ball = Ball::with_velocity(paddle.x + paddle.width, PADDLE_Y, 0.0, 5.0);
        assert!(deflect_off_paddle(&mut ball, &paddle));
        // clamped to the full 60 degrees
        assert!((ball.dx - BASE_SPEED * (60f32).to_radians().sin()).abs() < 1e-4);
        assert!(ball.dy <= -MIN_VERTICAL_SPEED);
    }

    #[test]
    fn rising_ball_passes_through_paddle() {
        let paddle = Paddle::centered();
        let mut ball = Ball::with_velocity(paddle.center(), PADDLE_Y + 2.0, 0.0, -5.0);
        assert!(!deflect_off_paddle(&mut ball, &paddle));
        assert_eq!(ball.dy, -5.0);
    }

    #[test]
    fn block_hit_from_below_flips_dy_and_scores() {
        let mut s = session();
        let target = s.blocks[5].clone(); // row 0
        // one frame below the block, moving straight up
        let start_y = target.y + BLOCK_HEIGHT + 2.0;
        park(&mut s, Ball::with_velocity(target.x + 10.0, start_y, 0.0, -5.0));
        s.blocks.iter_mut().filter(|b| b.row > 0).for_each(|b| b.visible = false);

        step(&mut s, &Controls::default());
        assert!(!s.blocks[5].visible);
        assert_eq!(s.score, 10);
        assert_eq!(s.balls[0].dy, 5.0);
        assert_eq!(s.balls[0].dx, 0.0);
    }

    #[test]
    fn block_hit_from_side_flips_dx() {
        assert_eq!(
            hit_side(&Bounds::new(0.0, 50.0, 10.0, 10.0), &Bounds::new(12.0, 45.0, 46.0, 20.0)),
            HitSide::Vertical
        );
        assert_eq!(
            hit_side(&Bounds::new(20.0, 20.0, 10.0, 10.0), &Bounds::new(12.0, 45.0, 46.0, 20.0)),
            HitSide::Horizontal
        );
        // already inside the block last frame
        assert_eq!(
            hit_side(&Bounds::new(20.0, 50.0, 10.0, 10.0), &Bounds::new(12.0, 45.0, 46.0, 20.0)),
            HitSide::Corner
        );
    }

    /// Leave only block 53 (row 5, column 3) standing.
    fn lone_block(s: &mut Session) -> Block {
        s.blocks.iter_mut().for_each(|b| b.visible = false);
        s.blocks[53].visible = true;
        s.blocks[53].clone()
    }

    #[test]
    fn side_hit_in_a_step_flips_only_dx() {
        let mut s = session();
        let target = lone_block(&mut s);
        // just left of the block, level with it, heading right
        let x = target.x - BALL_SIZE - 2.0;
        park(&mut s, Ball::with_velocity(x, target.y + 5.0, 5.0, -1.0));

        step(&mut s, &Controls::default());
        assert!(!s.blocks[53].visible);
        assert_eq!(s.score, 60);
        assert_eq!((s.balls[0].dx, s.balls[0].dy), (-5.0, -1.0));
    }

    #[test]
    fn hit_from_inside_a_block_flips_both() {
        let mut s = session();
        let target = lone_block(&mut s);
        park(&mut s, Ball::with_velocity(target.x + 11.0, target.y + 5.0, 2.0, -1.0));

        step(&mut s, &Controls::default());
        assert!(!s.blocks[53].visible);
        assert_eq!((s.balls[0].dx, s.balls[0].dy), (-2.0, 1.0));
    }

    #[test]
    fn fast_pickup_speeds_up_motion() {
        let mut s = session();
        park(&mut s, Ball::with_velocity(250.0, 300.0, 2.0, -4.0));
        apply_powerup(&mut s, PowerupKind::Fast);
        step(&mut s, &Controls::default());
        let ball = &s.balls[0];
        assert!((ball.x - 253.0).abs() < 1e-4);
        assert!((ball.y - 294.0).abs() < 1e-4);
        // the modifier scales movement, not the stored velocity
        assert_eq!((ball.dx, ball.dy), (2.0, -4.0));
    }

    #[test]
    fn only_one_block_per_ball_per_frame() {
        let mut s = session();
        // straddle two neighbours in row 5
        let a = s.blocks[50].clone();
        let x = a.x + BLOCK_WIDTH - 3.0;
        park(&mut s, Ball::with_velocity(x, a.y + BLOCK_HEIGHT + 1.0, 0.0, -5.0));
        step(&mut s, &Controls::default());
        let destroyed = s.blocks.iter().filter(|b| !b.visible).count();
        assert_eq!(destroyed, 1);
    }

    #[test]
    fn destroyed_blocks_stay_destroyed() {
        let mut s = session();
        s.blocks[0].visible = false;
        let target = s.blocks[0].clone();
        park(&mut s, Ball::with_velocity(target.x + 10.0, target.y + 5.0, 0.0, -1.0));
        let score = s.score;
        for _ in 0..3 {
            step(&mut s, &Controls::default());
            assert!(!s.blocks[0].visible);
        }
        // nothing else sits under the ball, and block 0 no longer scores
        assert_eq!(s.score, score);
    }

    #[test]
    fn clearing_the_last_block_wins() {
        let mut s = session();
        for b in s.blocks.iter_mut().skip(1) {
            b.visible = false;
        }
        let target = s.blocks[0].clone();
        park(
            &mut s,
            Ball::with_velocity(target.x + 10.0, target.y + BLOCK_HEIGHT + 2.0, 0.0, -5.0),
        );
        assert_eq!(step(&mut s, &Controls::default()), StepOutcome::Won);
        assert!(s.all_cleared());
    }

    #[test]
    fn no_win_while_any_block_remains() {
        let mut s = session();
        for b in s.blocks.iter_mut().skip(2) {
            b.visible = false;
        }
        let target = s.blocks[0].clone();
        park(
            &mut s,
            Ball::with_velocity(target.x + 10.0, target.y + BLOCK_HEIGHT + 2.0, 0.0, -5.0),
        );
        assert_eq!(step(&mut s, &Controls::default()), StepOutcome::Continue);
        assert_eq!(s.blocks_left(), 1);
    }

    #[test]
    fn tagged_block_drops_its_powerup() {
        let mut s = session();
        s.blocks[0].powerup = Some(PowerupKind::Slow);
        let target = s.blocks[0].clone();
        park(
            &mut s,
            Ball::with_velocity(target.x + 10.0, target.y + BLOCK_HEIGHT + 2.0, 0.0, -5.0),
        );
        step(&mut s, &Controls::default());
        assert_eq!(s.powerups.len(), 1);
        assert_eq!(s.powerups[0].kind, PowerupKind::Slow);
        assert_eq!(s.powerups[0].x, target.x + 13.0);
    }

    #[test]
    fn expand_reverts_exactly_after_its_duration() {
        let mut s = session();
        // keep the ball busy near the top for the whole duration
        park(&mut s, Ball::with_velocity(250.0, 300.0, 0.0, 0.0));
        s.blocks.iter_mut().for_each(|b| b.visible = false);
        s.blocks[0].visible = true;

        apply_powerup(&mut s, PowerupKind::Expand);
        assert_eq!(s.paddle.width, PADDLE_WIDTH * 1.5);
        let frames = s.settings.powerup_frames;
        for _ in 0..frames - 1 {
            step(&mut s, &Controls::default());
            assert_eq!(s.paddle.width, 120.0);
        }
        step(&mut s, &Controls::default());
        assert_eq!(s.paddle.width, PADDLE_WIDTH);
    }

    #[test]
    fn caught_pickup_applies_its_effect() {
        let mut s = session();
        park(&mut s, Ball::with_velocity(250.0, 300.0, 0.0, -1.0));
        let x = s.paddle.x + 10.0;
        s.powerups.push(Powerup {
            x,
            y: PADDLE_Y - POWERUP_SIZE - 1.0,
            kind: PowerupKind::Expand,
        });
        step(&mut s, &Controls::default());
        assert!(s.powerups.is_empty());
        assert!(s.paddle.is_expanded());
    }

    #[test]
    fn missed_pickup_falls_off() {
        let mut s = session();
        s.paddle.x = 0.0;
        s.powerups.push(Powerup {
            x: 400.0,
            y: HEIGHT - 1.0,
            kind: PowerupKind::Fast,
        });
        step(&mut s, &Controls::default());
        assert!(s.powerups.is_empty());
        assert_eq!(s.speed_modifier, 1.0);
    }

    #[test]
    fn multi_adds_two_balls_from_the_first() {
        let mut s = session();
        park(&mut s, Ball::with_velocity(123.0, 321.0, 1.0, -1.0));
        apply_powerup(&mut s, PowerupKind::Multi);
        assert_eq!(s.balls.len(), 3);
        for ball in &s.balls[1..] {
            assert_eq!((ball.x, ball.y), (123.0, 321.0));
            assert!((ball.speed() - BASE_SPEED).abs() < 1e-4);
        }
    }

    #[test]
    fn multi_without_balls_does_nothing() {
        let mut s = session();
        s.balls.clear();
        apply_powerup(&mut s, PowerupKind::Multi);
        assert!(s.balls.is_empty());
    }

    #[test]
    fn speed_modifier_scales_motion_and_expires() {
        let mut s = session();
        park(&mut s, Ball::with_velocity(250.0, 300.0, 0.0, -5.0));
        apply_powerup(&mut s, PowerupKind::Slow);
        step(&mut s, &Controls::default());
        assert!((s.balls[0].y - 297.0).abs() < 1e-4);

        s.balls[0].dx = 1.25;
        s.balls[0].dy = -0.5;
        s.speed_timer.start(1);
        step(&mut s, &Controls::default());
        assert_eq!(s.speed_modifier, 1.0);
        assert_eq!((s.balls[0].dx, s.balls[0].dy), (5.0, -5.0));
    }

    #[test]
    fn renormalize_defaults_vertical_component() {
        let mut ball = Ball::with_velocity(0.0, 0.0, -3.0, 0.0);
        renormalize(&mut ball);
        assert_eq!((ball.dx, ball.dy), (-5.0, -5.0));

        let mut still = Ball::with_velocity(0.0, 0.0, 0.0, 0.0);
        renormalize(&mut still);
        assert_eq!((still.dx, still.dy), (0.0, 0.0));
    }

    #[test]
    fn pointer_then_keys_switches_control() {
        let mut s = session();
        let pointer = Controls {
            pointer_x: Some(100.0),
            ..Default::default()
        };
        step(&mut s, &pointer);
        assert!(s.use_pointer);
        assert_eq!(s.paddle.x, 60.0);

        let right = Controls {
            right: true,
            ..Default::default()
        };
        step(&mut s, &right);
        assert!(!s.use_pointer);
        step(&mut s, &right);
        assert_eq!(s.paddle.x, 60.0 + s.settings.paddle_speed);
    }

    #[test]
    fn paddle_is_clamped_to_the_field() {
        let mut s = session();
        let far = Controls {
            pointer_x: Some(WIDTH + 100.0),
            ..Default::default()
        };
        step(&mut s, &far);
        assert_eq!(s.paddle.x, WIDTH - s.paddle.width);
    }

    proptest! {
        #[test]
        fn wall_bounce_preserves_magnitude(x in -20.0f32..520.0, dx in -8.0f32..8.0) {
            let mut ball = Ball::with_velocity(x, 300.0, dx, 1.0);
            let hits = x <= 0.0 || x >= WIDTH - BALL_SIZE;
            bounce_walls(&mut ball);
            if hits {
                prop_assert_eq!(ball.dx, -dx);
            } else {
                prop_assert_eq!(ball.dx, dx);
            }
            prop_assert!(ball.x >= 0.0 && ball.x <= WIDTH - BALL_SIZE || !hits);
        }

        #[test]
        fn paddle_hit_never_flattens(offset in -44.0f32..44.0, dx in -6.0f32..6.0, dy in 0.1f32..8.0) {
            let paddle = Paddle::centered();
            let x = paddle.center() - BALL_SIZE / 2.0 + offset;
            let mut ball = Ball::with_velocity(x, PADDLE_Y - 4.0, dx, dy);
            prop_assert!(deflect_off_paddle(&mut ball, &paddle));
            prop_assert!(ball.dy.abs() >= MIN_VERTICAL_SPEED);
            prop_assert!(ball.dy < 0.0);
            prop_assert_eq!(ball.y, PADDLE_Y - BALL_SIZE);
        }
    }
}
