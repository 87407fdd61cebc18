//! 확률적 공정 전이에 쓰이는 난수원.
//!
//! 모든 난수는 `RandomSource`를 통해 주입된다. 같은 시드(또는 같은 재생 시퀀스)는
//! 같은 공정 궤적을 만든다.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// 시드를 지정하지 않았을 때 쓰는 기본값.
pub const DEFAULT_SEED: u64 = 42;

/// [0, 1) 균등 난수를 공급하는 인터페이스.
pub trait RandomSource {
    /// [0, 1) 구간의 균등 난수
    fn next_unit(&mut self) -> f64;

    /// 확률 `p`의 베르누이 시행
    fn chance(&mut self, p: f64) -> bool {
        self.next_unit() < p
    }

    /// [0, span) 균등 난수
    fn uniform(&mut self, span: f64) -> f64 {
        self.next_unit() * span.max(0.0)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// `ChaCha8Rng` 기반 결정론적 난수원. 플랫폼과 무관하게 같은 시드는 같은 값을 낸다.
#[derive(Debug, Clone)]
pub struct SimRng(pub ChaCha8Rng);

impl Default for SimRng {
    fn default() -> Self {
        Self::from_seed_u64(DEFAULT_SEED)
    }
}

impl SimRng {
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl RandomSource for SimRng {
    fn next_unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

/// 미리 기록된 값을 순환 재생하는 난수원. 테스트와 장애 재현에 사용한다.
///
/// 값은 [0, 1)로 클램프된다. 시퀀스가 비어 있으면 0.5를 반환한다.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    draws: Vec<f64>,
    cursor: usize,
    fallback: f64,
}

impl ReplaySource {
    pub fn new(draws: Vec<f64>) -> Self {
        Self {
            draws,
            cursor: 0,
            fallback: 0.5,
        }
    }

    /// 항상 같은 값을 내는 난수원
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// 지금까지 소비한 난수 개수
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ReplaySource {
    fn next_unit(&mut self) -> f64 {
        let v = if self.draws.is_empty() {
            self.fallback
        } else {
            self.draws[self.cursor % self.draws.len()]
        };
        self.cursor += 1;
        v.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
