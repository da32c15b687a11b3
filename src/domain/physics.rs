/// Continuous physics: gravity, friction, floor and walls.
///
/// ## Architecture
///
/// One floor line (`rules::FLOOR_Y`) and two optional walls. No terrain.
/// Every body is integrated with explicit Euler steps, one call per tick:
///
///   fall()   vy += GRAVITY, y += vy
///   slide()  vx *= FRICTION, x += vx
///   land()   bottom > floor → rest exactly on floor, vy = 0
///
/// Callers compose these in the order their entity needs. The player
/// slides before it falls; ground creatures fall and land before they
/// slide (a hard landing has to be seen before the floor clamp zeroes vy).
///
/// ## Support Rules
///
/// A body is GROUNDED when its lower edge is within 1 px of the floor.
/// A body may JUMP when grounded and |vy| < 0.1.
///
/// Flyers never call `fall()`. They `bounce()` off the floor instead of
/// resting on it, and are held below the top of the view.

use super::entity::Body;
use super::rules;

/// Tolerance for "standing on the floor".
pub const GROUND_TOLERANCE: f32 = 1.0;
/// |vy| below this counts as "not moving vertically" for jumps.
pub const REST_VY: f32 = 0.1;
/// Minimum upward speed after a flyer touches the floor.
pub const BOUNCE_VY: f32 = 3.0;

// ══════════════════════════════════════════════════════════════
// Integration
// ══════════════════════════════════════════════════════════════

#[inline]
pub fn fall(body: &mut Body) {
    body.vy += rules::GRAVITY;
    body.y += body.vy;
}

#[inline]
pub fn slide(body: &mut Body) {
    body.vx *= rules::FRICTION;
    body.x += body.vx;
}

/// Clamp to the floor. Returns the vertical speed at impact when the
/// body was below the floor line, `None` otherwise.
pub fn land(body: &mut Body) -> Option<f32> {
    if body.bottom() > rules::FLOOR_Y {
        let impact = body.vy;
        body.y = rules::FLOOR_Y - body.height;
        body.vy = 0.0;
        Some(impact)
    } else {
        None
    }
}

/// Flyer floor contact: pushed back up instead of resting.
pub fn bounce(body: &mut Body) -> bool {
    if body.bottom() > rules::FLOOR_Y {
        body.y = rules::FLOOR_Y - body.height;
        body.vy = -body.vy.abs().max(BOUNCE_VY);
        true
    } else {
        false
    }
}

/// Keep the top edge inside the view.
pub fn clamp_ceiling(body: &mut Body) {
    if body.y < 0.0 {
        body.y = 0.0;
        if body.vy < 0.0 { body.vy = 0.0; }
    }
}

// ══════════════════════════════════════════════════════════════
// Queries
// ══════════════════════════════════════════════════════════════

#[inline]
pub fn is_grounded(body: &Body) -> bool {
    body.bottom() >= rules::FLOOR_Y - GROUND_TOLERANCE
}

#[inline]
pub fn can_jump(body: &Body) -> bool {
    body.vy.abs() < REST_VY && is_grounded(body)
}

// ══════════════════════════════════════════════════════════════
// Walls
// ══════════════════════════════════════════════════════════════

/// Horizontal world limits. Story mode has only a left wall; boss-rush
/// walls both sides of the arena.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Bounds {
    pub left: f32,
    pub right: Option<f32>,
}

impl Bounds {
    pub fn left_wall() -> Self {
        Bounds { left: 0.0, right: None }
    }

    pub fn arena(width: f32) -> Self {
        Bounds { left: 0.0, right: Some(width) }
    }
}

/// Push the body back inside `bounds`. Velocity into a wall is dropped.
pub fn clamp_to_bounds(body: &mut Body, bounds: Bounds) {
    if body.x < bounds.left {
        body.x = bounds.left;
        if body.vx < 0.0 { body.vx = 0.0; }
    }
    if let Some(right) = bounds.right {
        let max_x = (right - body.width).max(bounds.left);
        if body.x > max_x {
            body.x = max_x;
            if body.vx > 0.0 { body.vx = 0.0; }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_at(x: f32, y: f32) -> Body {
        Body::new(x, y, 50.0, 80.0)
    }

    fn standing() -> Body {
        body_at(100.0, rules::FLOOR_Y - 80.0)
    }

    // ── Integration ──

    #[test]
    fn fall_accumulates_gravity() {
        let mut b = body_at(0.0, 0.0);
        fall(&mut b);
        fall(&mut b);
        assert!((b.vy - 2.0 * rules::GRAVITY).abs() < 1e-5);
        assert!((b.y - 3.0 * rules::GRAVITY).abs() < 1e-5);
    }

    #[test]
    fn slide_decays_velocity() {
        let mut b = body_at(0.0, 0.0);
        b.vx = 10.0;
        slide(&mut b);
        assert!((b.vx - 8.0).abs() < 1e-5);
        assert!((b.x - 8.0).abs() < 1e-5);
    }

    #[test]
    fn land_rests_exactly_on_floor() {
        let mut b = body_at(0.0, rules::FLOOR_Y - 70.0);
        b.vy = 6.0;
        assert_eq!(land(&mut b), Some(6.0));
        assert_eq!(b.bottom(), rules::FLOOR_Y);
        assert_eq!(b.vy, 0.0);
    }

    #[test]
    fn land_ignores_airborne_body() {
        let mut b = body_at(0.0, 0.0);
        b.vy = 3.0;
        assert_eq!(land(&mut b), None);
        assert_eq!(b.vy, 3.0);
    }

    #[test]
    fn bounce_sends_flyer_upward() {
        let mut b = body_at(0.0, rules::FLOOR_Y - 60.0);
        b.vy = 1.0;
        assert!(bounce(&mut b));
        assert!(b.vy <= -BOUNCE_VY);
        assert_eq!(b.bottom(), rules::FLOOR_Y);
    }

    #[test]
    fn ceiling_clamp() {
        let mut b = body_at(0.0, -20.0);
        b.vy = -4.0;
        clamp_ceiling(&mut b);
        assert_eq!(b.y, 0.0);
        assert_eq!(b.vy, 0.0);
    }

    // ── Queries ──

    #[test]
    fn standing_body_can_jump() {
        let b = standing();
        assert!(is_grounded(&b));
        assert!(can_jump(&b));
    }

    #[test]
    fn rising_body_cannot_jump() {
        let mut b = standing();
        b.vy = -5.0;
        assert!(!can_jump(&b));
    }

    #[test]
    fn airborne_body_is_not_grounded() {
        let b = body_at(0.0, 100.0);
        assert!(!is_grounded(&b));
        assert!(!can_jump(&b));
    }

    // ── Walls ──

    #[test]
    fn left_wall_only() {
        let mut b = body_at(-5.0, 0.0);
        b.vx = -3.0;
        clamp_to_bounds(&mut b, Bounds::left_wall());
        assert_eq!(b.x, 0.0);
        assert_eq!(b.vx, 0.0);

        let mut far = body_at(1.0e6, 0.0);
        clamp_to_bounds(&mut far, Bounds::left_wall());
        assert_eq!(far.x, 1.0e6);
    }

    #[test]
    fn arena_walls_both_sides() {
        let mut b = body_at(1590.0, 0.0);
        b.vx = 4.0;
        clamp_to_bounds(&mut b, Bounds::arena(1600.0));
        assert_eq!(b.x, 1550.0);
        assert_eq!(b.vx, 0.0);
    }
}
