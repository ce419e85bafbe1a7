//! ISAAC (Indirection, Shift, Accumulate, Add, and Count) state machine
//!
//! By Bob Jenkins. Public Domain.

const RAND_SIZL: usize = 8;
const RAND_SIZE: usize = 1 << RAND_SIZL; // 256
const HALF: usize = RAND_SIZE / 2;

/// Shift applied to one lane while scrambling the seed block.
#[derive(Clone, Copy)]
enum Shift {
    Left(u32),
    Right(u32),
}

impl Shift {
    #[inline]
    fn apply(self, x: u32) -> u32 {
        match self {
            Shift::Left(s) => x << s,
            Shift::Right(s) => x >> s,
        }
    }
}

const MIX_SHIFTS: [Shift; 8] = [
    Shift::Left(11),
    Shift::Right(2),
    Shift::Left(8),
    Shift::Right(16),
    Shift::Left(10),
    Shift::Right(4),
    Shift::Left(8),
    Shift::Right(9),
];

const STEP_SHIFTS: [Shift; 4] = [
    Shift::Left(13),
    Shift::Right(6),
    Shift::Left(2),
    Shift::Right(16),
];

/// Raw ISAAC context producing 32-bit words.
#[derive(Clone)]
pub(crate) struct IsaacCore {
    cursor: usize,
    results: [u32; RAND_SIZE],
    memory: [u32; RAND_SIZE],
    a: u32,
    b: u32,
    c: u32,
}

impl IsaacCore {
    /// Build a context whose result block is seeded from the two halves of `seed`.
    pub(crate) fn from_u64(seed: u64) -> Self {
        let lo = seed as u32;
        let hi = (seed >> 32) as u32;

        let mut results = [0u32; RAND_SIZE];
        for (i, word) in results.iter_mut().enumerate() {
            *word = if i % 2 == 0 { lo } else { hi };
        }

        let mut core = Self {
            cursor: 0,
            results,
            memory: [0; RAND_SIZE],
            a: 0,
            b: 0,
            c: 0,
        };
        core.init();
        core
    }

    fn init(&mut self) {
        const GOLDEN_RATIO: u32 = 0x9e3779b9;

        let mut lanes = [GOLDEN_RATIO; 8];
        for _ in 0..4 {
            Self::mix(&mut lanes);
        }

        // Two passes so every seed word reaches every memory word
        for pass in 0..2 {
            for block in (0..RAND_SIZE).step_by(8) {
                for (k, lane) in lanes.iter_mut().enumerate() {
                    let src = if pass == 0 {
                        self.results[block + k]
                    } else {
                        self.memory[block + k]
                    };
                    *lane = lane.wrapping_add(src);
                }
                Self::mix(&mut lanes);
                self.memory[block..block + 8].copy_from_slice(&lanes);
            }
        }

        self.refill();
    }

    #[inline]
    fn mix(lanes: &mut [u32; 8]) {
        for (k, shift) in MIX_SHIFTS.iter().enumerate() {
            let next = (k + 1) % 8;
            lanes[k] ^= shift.apply(lanes[next]);
            lanes[(k + 3) % 8] = lanes[(k + 3) % 8].wrapping_add(lanes[k]);
            lanes[next] = lanes[next].wrapping_add(lanes[(k + 2) % 8]);
        }
    }

    #[inline]
    fn lookup(&self, x: u32) -> u32 {
        self.memory[((x >> 2) as usize) & (RAND_SIZE - 1)]
    }

    /// Produce the next block of 256 words.
    fn refill(&mut self) {
        self.c = self.c.wrapping_add(1);
        self.b = self.b.wrapping_add(self.c);

        for i in 0..RAND_SIZE {
            let partner = (i + HALF) % RAND_SIZE;
            let x = self.memory[i];
            self.a = (self.a ^ STEP_SHIFTS[i % 4].apply(self.a)).wrapping_add(self.memory[partner]);
            let y = self.lookup(x).wrapping_add(self.a).wrapping_add(self.b);
            self.memory[i] = y;
            self.results[i] = self.lookup(y >> RAND_SIZL).wrapping_add(x);
            self.b = self.results[i];
        }

        self.cursor = RAND_SIZE;
    }

    #[inline]
    pub(crate) fn next_u32(&mut self) -> u32 {
        if self.cursor == 0 {
            self.refill();
        }
        self.cursor -= 1;
        self.results[self.cursor]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = IsaacCore::from_u64(42);
        let mut b = IsaacCore::from_u64(42);

        for _ in 0..1000 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn high_word_of_seed_matters() {
        let mut a = IsaacCore::from_u64(42);
        let mut b = IsaacCore::from_u64(42 | (1 << 40));

        let first_a: Vec<u32> = (0..8).map(|_| a.next_u32()).collect();
        let first_b: Vec<u32> = (0..8).map(|_| b.next_u32()).collect();
        assert_ne!(first_a, first_b);
    }

    #[test]
    fn survives_many_refills() {
        let mut rng = IsaacCore::from_u64(7);
        let mut zeros = 0;
        for _ in 0..(RAND_SIZE * 50) {
            if rng.next_u32() == 0 {
                zeros += 1;
            }
        }
        assert!(zeros < 3);
    }
}
