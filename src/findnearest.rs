use screeps::Position;

pub trait FindNearestItertools: Iterator {
    fn find_nearest_linear_by<F, V>(self, other_pos: Position, pos_generator: F) -> Option<V>
    where
        Self: Iterator<Item = V> + Sized,
        F: Fn(&V) -> Position,
    {
        self.map(|pos_object| (other_pos.get_range_to(pos_generator(&pos_object)), pos_object))
            .min_by_key(|(length, _)| *length)
            .map(|(_, pos_object)| pos_object)
    }
}

impl<T: ?Sized> FindNearestItertools for T where T: Iterator {}

/// Tiles in the same room within range 1 of `pos`, excluding `pos` itself.
pub fn adjacent_positions(pos: Position) -> Vec<Position> {
    let x = pos.x().u8() as i16;
    let y = pos.y().u8() as i16;

    let mut result = Vec::with_capacity(8);

    for dy in -1..=1i16 {
        for dx in -1..=1i16 {
            if dx == 0 && dy == 0 {
                continue;
            }

            let nx = x + dx;
            let ny = y + dy;

            if !(0..50).contains(&nx) || !(0..50).contains(&ny) {
                continue;
            }

            if let (Ok(rx), Ok(ry)) = (screeps::RoomCoordinate::new(nx as u8), screeps::RoomCoordinate::new(ny as u8)) {
                result.push(Position::new(rx, ry, pos.room_name()));
            }
        }
    }

    result
}
