//! 고정 간격 틱 스케줄러와 연속 공정 컨트롤러.
//!
//! 단일 스레드 협조형 모델이다. 외부 루프가 현재 시각으로 `poll`을 호출하면
//! 기한이 된 틱을 최대 하나 실행한다. 진행 중인 틱이 있으면 새 틱은 건너뛰고,
//! 밀린 간격은 따라잡지 않는다. 티켓은 발급 번호로 식별되며 진행 중인 틱의 티켓만
//! 한 번 반영될 수 있으므로, 정지 이전 틱이나 이미 반영된 틱은 상태를 바꾸지 못한다.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::machine::MachineState;
use super::params::ProcessParameters;
use super::rng::RandomSource;
use super::state::ContinuousProcessState;
use super::tick::{advance, TickInputs};
use crate::composition::WasteComposition;

/// 연속 공정 운전 단계.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessPhase {
    Idle,
    Running,
}

/// 스케줄러가 발급한 틱 실행 권한. 복제할 수 없고 `finish`/`abort`에서 소비된다.
#[derive(Debug, PartialEq, Eq)]
pub struct TickTicket {
    seq: u64,
}

/// 고정 간격 틱 스케줄러. 동시에 활성 틱은 최대 하나다.
#[derive(Debug, Clone)]
pub struct TickScheduler {
    interval: Duration,
    next_due: Option<Duration>,
    /// 마지막으로 발급한 티켓 번호. 재무장/취소에도 되돌리지 않는다.
    last_seq: u64,
    /// 진행 중인 틱의 티켓 번호
    in_flight: Option<u64>,
    skipped: u64,
}

impl TickScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            next_due: None,
            last_seq: 0,
            in_flight: None,
            skipped: 0,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// 진행 중인 틱이 있는지
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// 겹쳐서 건너뛴 틱 수
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// `now` 기준 한 간격 뒤부터 틱을 발급한다. 이전에 발급된 티켓은 무효가 된다.
    pub fn arm(&mut self, now: Duration) {
        self.in_flight = None;
        self.next_due = Some(now + self.interval);
    }

    /// 예약을 즉시 취소한다. 이전에 발급된 티켓은 모두 무효가 된다.
    pub fn cancel(&mut self) {
        self.in_flight = None;
        self.next_due = None;
    }

    /// 기한이 된 틱이 있으면 티켓을 발급한다.
    ///
    /// 이전 틱이 아직 끝나지 않았으면 이번 기한은 건너뛴다. 여러 간격이 밀렸어도
    /// 티켓은 하나만 발급하고 다음 기한은 `now` 이후 첫 간격으로 맞춘다.
    pub fn try_begin(&mut self, now: Duration) -> Option<TickTicket> {
        let due = self.next_due?;
        if now < due {
            return None;
        }
        let missed = ((now - due).as_nanos() / self.interval.as_nanos()).min(u32::MAX as u128) as u32;
        self.next_due = Some(due + self.interval * missed.saturating_add(1));
        if self.in_flight.is_some() {
            self.skipped += 1;
            debug!(target: "twin.process", due_ms = due.as_millis() as u64, "이전 틱 진행 중, 건너뜀");
            return None;
        }
        self.last_seq += 1;
        self.in_flight = Some(self.last_seq);
        Some(TickTicket { seq: self.last_seq })
    }

    /// 틱 완료를 알린다. 지금 진행 중인 틱의 티켓이면 슬롯을 비우고 `true`(결과 반영 가능).
    pub fn finish(&mut self, ticket: TickTicket) -> bool {
        self.release(ticket, "취소되었거나 이미 끝난 틱 결과 폐기")
    }

    /// 결과를 반영하지 않고 틱을 포기한다. 진행 중 슬롯을 풀어 다음 기한부터 다시 발급한다.
    pub fn abort(&mut self, ticket: TickTicket) -> bool {
        self.release(ticket, "이미 끝난 틱 포기 요청 무시")
    }

    fn release(&mut self, ticket: TickTicket, stale_msg: &'static str) -> bool {
        if self.in_flight != Some(ticket.seq) {
            debug!(target: "twin.process", seq = ticket.seq, "{stale_msg}");
            return false;
        }
        self.in_flight = None;
        true
    }
}

/// 계산은 끝났지만 아직 반영되지 않은 틱.
///
/// `commit_tick` 또는 `abort_tick`으로 돌려줘야 한다. 그냥 버리면 진행 중 슬롯이
/// 정지/재시작 전까지 풀리지 않는다.
#[derive(Debug)]
#[must_use = "commit_tick 또는 abort_tick으로 돌려줘야 다음 틱이 발급된다"]
pub struct PendingTick {
    ticket: TickTicket,
    next: ContinuousProcessState,
}

impl PendingTick {
    pub fn state(&self) -> &ContinuousProcessState {
        &self.next
    }
}

/// 연속 공정 컨트롤러. Idle ⇄ Running 전환은 호출자가 결정한다.
#[derive(Debug, Clone)]
pub struct ProcessController<R: RandomSource> {
    params: ProcessParameters,
    state: ContinuousProcessState,
    phase: ProcessPhase,
    scheduler: TickScheduler,
    rng: R,
    input_humidity_pct: f64,
}

impl<R: RandomSource> ProcessController<R> {
    pub fn new(params: ProcessParameters, composition: WasteComposition, rng: R) -> Self {
        let state = ContinuousProcessState::idle(composition, &params.machines, params.silo_capacity_kg);
        let scheduler = TickScheduler::new(Duration::from_millis(params.tick_interval_ms));
        Self {
            params,
            state,
            phase: ProcessPhase::Idle,
            scheduler,
            rng,
            input_humidity_pct: 0.0,
        }
    }

    pub fn phase(&self) -> ProcessPhase {
        self.phase
    }

    pub fn state(&self) -> &ContinuousProcessState {
        &self.state
    }

    /// 직렬화 가능한 상태 사본
    pub fn snapshot(&self) -> ContinuousProcessState {
        self.state.clone()
    }

    pub fn params(&self) -> &ProcessParameters {
        &self.params
    }

    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    pub fn input_humidity_pct(&self) -> f64 {
        self.input_humidity_pct
    }

    pub fn set_input_humidity(&mut self, humidity_pct: f64) {
        self.input_humidity_pct = if humidity_pct.is_finite() {
            humidity_pct.clamp(0.0, 100.0)
        } else {
            0.0
        };
    }

    /// 조성 한 항목을 바꾸고 나머지를 비례 보정한다. 다음 틱부터 반영된다.
    pub fn set_composition_share(&mut self, key: &str, value: f64) {
        self.state.composition = self.state.composition.with_share(key, value);
    }

    /// 설비를 수동 정지/복귀시킨다. 운전 중이 아니거나 모르는 설비면 `false`.
    pub fn set_machine_offline(&mut self, name: &str, offline: bool) -> bool {
        if self.phase != ProcessPhase::Running {
            return false;
        }
        let Some(status) = self.state.machines.iter_mut().find(|m| m.name == name) else {
            return false;
        };
        if offline {
            status.state = MachineState::Off;
        } else if status.state == MachineState::Off {
            status.state = MachineState::Ok;
        }
        true
    }

    /// 운전을 시작한다. 이미 운전 중이면 아무것도 하지 않는다.
    pub fn start(&mut self, now: Duration) {
        if self.phase == ProcessPhase::Running {
            return;
        }
        self.phase = ProcessPhase::Running;
        self.scheduler.arm(now);
        info!(target: "twin.process", interval_ms = self.params.tick_interval_ms, "연속 공정 시작");
    }

    /// 운전을 멈춘다. 스케줄을 즉시 취소하고 상태를 정지 기준값으로 되돌린다(조성은 유지).
    pub fn stop(&mut self) {
        self.scheduler.cancel();
        self.phase = ProcessPhase::Idle;
        self.state = ContinuousProcessState::idle(
            self.state.composition.clone(),
            &self.params.machines,
            self.params.silo_capacity_kg,
        );
        info!(target: "twin.process", "연속 공정 정지");
    }

    /// 기한이 된 틱을 계산만 하고 반영은 보류한다.
    pub fn begin_tick(&mut self, now: Duration) -> Option<PendingTick> {
        if self.phase != ProcessPhase::Running {
            return None;
        }
        let ticket = self.scheduler.try_begin(now)?;
        let inputs = TickInputs {
            input_humidity_pct: self.input_humidity_pct,
            tick_duration_sec: self.params.tick_duration_sec(),
        };
        let next = advance(&self.state, &inputs, &self.params, &mut self.rng);
        Some(PendingTick { ticket, next })
    }

    /// 보류된 틱을 반영한다. 정지/재시작으로 무효가 됐거나 이미 처리된 틱이면 버리고 `false`.
    pub fn commit_tick(&mut self, pending: PendingTick) -> bool {
        if !self.scheduler.finish(pending.ticket) {
            return false;
        }
        // 계산 도중 바뀐 조성은 유지
        let mut next = pending.next;
        next.composition = self.state.composition.clone();
        self.state = next;
        true
    }

    /// 보류된 틱을 반영하지 않고 버린다. 상태는 그대로 두고 다음 기한부터 틱을 다시 발급한다.
    pub fn abort_tick(&mut self, pending: PendingTick) -> bool {
        let released = self.scheduler.abort(pending.ticket);
        if released {
            debug!(target: "twin.process", tick = pending.next.tick, "틱 결과 반영 취소");
        }
        released
    }

    /// 기한이 된 틱을 하나 실행해 반영한다. 실행했으면 `true`.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.begin_tick(now) {
            Some(pending) => self.commit_tick(pending),
            None => false,
        }
    }

    /// 시계와 무관하게 다음 기한 시각으로 틱을 하나 진행한다. 배치 실행용.
    pub fn step(&mut self) -> bool {
        match self.scheduler.next_due {
            Some(due) => self.poll(due),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn ticket_from_cancelled_run_does_not_release_new_tick() {
        let mut s = TickScheduler::new(secs(1));
        s.arm(secs(0));
        let old = s.try_begin(secs(1)).expect("due");
        s.cancel();
        s.arm(secs(1));
        let current = s.try_begin(secs(2)).expect("due");

        assert!(!s.finish(old));
        assert!(s.is_busy());
        assert!(s.try_begin(secs(3)).is_none());
        assert!(s.finish(current));
        assert!(!s.is_busy());
    }

    #[test]
    fn abort_frees_slot_for_next_interval() {
        let mut s = TickScheduler::new(secs(1));
        s.arm(secs(0));
        let t = s.try_begin(secs(1)).expect("due");
        assert!(s.abort(t));
        assert!(s.try_begin(secs(2)).is_some());
        assert_eq!(s.skipped(), 0);
    }
}
