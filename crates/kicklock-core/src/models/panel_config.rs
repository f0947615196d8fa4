//! 패널 설정 모델.
//!
//! 백엔드는 `rc1`, `attack2`, `kickall` 같은 평면 키/값 객체를 주고받는다.
//! 내부에서는 채널별 구조체와 모드 열거형으로 다루고, 직렬화 시점에만
//! [`WireConfig`]로 평탄화한다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// 코드 입력 채널 수 (킥 채널 제외)
pub const CODE_CHANNELS: usize = 4;

/// 식별 코드 최대 길이
pub const MAX_CODE_LEN: usize = 10;

/// 채널별 설정 (코드, 대체 코드, 공격/대기 타이머)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSettings {
    /// 기본 식별 코드
    pub code: String,
    /// 대체 식별 코드
    pub alt_code: String,
    /// 공격 타이머 (ms)
    pub attack: i64,
    /// 대기(방어) 타이머 (ms)
    pub waiting: i64,
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self {
            code: String::new(),
            alt_code: String::new(),
            attack: 1940,
            waiting: 1910,
        }
    }
}

/// 접속 기기 프로필
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceProfile {
    #[default]
    #[serde(rename = "312")]
    Android,
    #[serde(rename = "323")]
    Ios,
    #[serde(rename = "352")]
    Web,
}

impl DeviceProfile {
    /// 백엔드 전송 코드
    pub fn code(&self) -> &'static str {
        match self {
            DeviceProfile::Android => "312",
            DeviceProfile::Ios => "323",
            DeviceProfile::Web => "352",
        }
    }
}

impl FromStr for DeviceProfile {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "312" => Ok(DeviceProfile::Android),
            "323" => Ok(DeviceProfile::Ios),
            "352" => Ok(DeviceProfile::Web),
            other => Err(CoreError::validation(
                "device",
                format!("알 수 없는 기기 코드: {other}"),
            )),
        }
    }
}

/// 동작 모드 (Off / Exit / Sleep 중 하나)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OperationalMode {
    Off,
    #[default]
    Exit,
    Sleep,
}

impl OperationalMode {
    /// 이 모드를 선택하는 필드 변경 묶음 (해제 먼저, 설정 마지막)
    pub fn mutations(&self) -> Vec<(ConfigField, FieldValue)> {
        match self {
            OperationalMode::Off => vec![
                (ConfigField::Exiting, FieldValue::Bool(false)),
                (ConfigField::Sleeping, FieldValue::Bool(false)),
            ],
            OperationalMode::Exit => vec![
                (ConfigField::Sleeping, FieldValue::Bool(false)),
                (ConfigField::Exiting, FieldValue::Bool(true)),
            ],
            OperationalMode::Sleep => vec![
                (ConfigField::Exiting, FieldValue::Bool(false)),
                (ConfigField::Sleeping, FieldValue::Bool(true)),
            ],
        }
    }
}

/// 킥 전략. 플래그 4개 중 최대 하나만 켜진다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KickStrategy {
    /// 킥 사용 안 함
    None,
    /// 목록 기반 킥 (`kickmode`)
    #[default]
    Kick,
    /// 전원 킥 (`kickall`)
    Everyone,
    /// 블랙리스트 기반 킥 (`kickbybl`)
    ByBlacklist,
    /// Dad+ 변형 (`dadplus`)
    DadPlus,
}

impl KickStrategy {
    const FLAGS: [ConfigField; 4] = [
        ConfigField::KickMode,
        ConfigField::KickAll,
        ConfigField::KickByBlacklist,
        ConfigField::DadPlus,
    ];

    /// 이 전략에 대응하는 플래그 필드
    pub fn flag(&self) -> Option<ConfigField> {
        match self {
            KickStrategy::None => None,
            KickStrategy::Kick => Some(ConfigField::KickMode),
            KickStrategy::Everyone => Some(ConfigField::KickAll),
            KickStrategy::ByBlacklist => Some(ConfigField::KickByBlacklist),
            KickStrategy::DadPlus => Some(ConfigField::DadPlus),
        }
    }

    /// 이 전략을 선택하는 필드 변경 묶음 (나머지 플래그 해제 후 대상 플래그 설정)
    pub fn mutations(&self) -> Vec<(ConfigField, FieldValue)> {
        let target = self.flag();
        let mut batch: Vec<_> = Self::FLAGS
            .iter()
            .filter(|f| Some(**f) != target)
            .map(|f| (*f, FieldValue::Bool(false)))
            .collect();
        if let Some(flag) = target {
            batch.push((flag, FieldValue::Bool(true)));
        }
        batch
    }

    fn from_flags(kick: bool, all: bool, by_blacklist: bool, dad_plus: bool) -> Self {
        // 이전 형식 스냅샷은 kickmode와 세부 플래그를 함께 켜 두므로 세부 플래그가 우선
        if dad_plus {
            KickStrategy::DadPlus
        } else if by_blacklist {
            KickStrategy::ByBlacklist
        } else if all {
            KickStrategy::Everyone
        } else if kick {
            KickStrategy::Kick
        } else {
            KickStrategy::None
        }
    }
}

/// 스칼라 필드 값
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl FieldValue {
    /// 공백만 있거나 빈 문자열인지
    pub fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.trim().is_empty())
    }

    fn kind(&self) -> &'static str {
        match self {
            FieldValue::Bool(_) => "bool",
            FieldValue::Int(_) => "int",
            FieldValue::Text(_) => "text",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// 설정 필드 식별자. 채널 필드는 1부터 시작하는 채널 번호를 가진다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    Code(usize),
    AltCode(usize),
    KickCode,
    Attack(usize),
    Waiting(usize),
    Planet,
    Device,
    AutoRelease,
    Smart,
    LowSecMode,
    Exiting,
    Sleeping,
    KickMode,
    KickAll,
    KickByBlacklist,
    DadPlus,
    Modena,
    Blacklist,
    GangBlacklist,
    KickBlacklist,
    KickGangBlacklist,
    TimerShift,
    IncrementValue,
    DecrementValue,
    MinAttack,
    MaxAttack,
    MinDefense,
    MaxDefense,
    Reconnect,
}

impl ConfigField {
    const SCALAR: [(ConfigField, &'static str); 24] = [
        (ConfigField::KickCode, "kickrc"),
        (ConfigField::Planet, "planet"),
        (ConfigField::Device, "device"),
        (ConfigField::AutoRelease, "autorelease"),
        (ConfigField::Smart, "smart"),
        (ConfigField::LowSecMode, "lowsecmode"),
        (ConfigField::Exiting, "exitting"),
        (ConfigField::Sleeping, "sleeping"),
        (ConfigField::KickMode, "kickmode"),
        (ConfigField::KickAll, "kickall"),
        (ConfigField::KickByBlacklist, "kickbybl"),
        (ConfigField::DadPlus, "dadplus"),
        (ConfigField::Modena, "modena"),
        (ConfigField::Blacklist, "blacklist"),
        (ConfigField::GangBlacklist, "gangblacklist"),
        (ConfigField::KickBlacklist, "kblacklist"),
        (ConfigField::KickGangBlacklist, "kgangblacklist"),
        (ConfigField::TimerShift, "timershift"),
        (ConfigField::IncrementValue, "incrementvalue"),
        (ConfigField::DecrementValue, "decrementvalue"),
        (ConfigField::MinAttack, "minatk"),
        (ConfigField::MaxAttack, "maxatk"),
        (ConfigField::MinDefense, "mindef"),
        (ConfigField::MaxDefense, "maxdef"),
    ];

    /// 모든 필드 목록 (채널 필드는 채널 순서대로)
    pub fn all() -> Vec<ConfigField> {
        let mut fields = Vec::new();
        for n in 1..=CODE_CHANNELS {
            fields.extend([
                ConfigField::Code(n),
                ConfigField::AltCode(n),
                ConfigField::Attack(n),
                ConfigField::Waiting(n),
            ]);
        }
        fields.extend(Self::SCALAR.iter().map(|(f, _)| *f));
        fields.push(ConfigField::Reconnect);
        fields
    }

    /// 식별 코드 필드 여부 (기본/대체/킥 코드)
    pub fn is_identity_code(&self) -> bool {
        matches!(
            self,
            ConfigField::Code(_) | ConfigField::AltCode(_) | ConfigField::KickCode
        )
    }

    /// 백엔드 키 이름
    pub fn key(&self) -> String {
        match self {
            ConfigField::Code(n) => format!("rc{n}"),
            ConfigField::AltCode(n) => format!("rcl{n}"),
            ConfigField::Attack(n) => format!("attack{n}"),
            ConfigField::Waiting(n) => format!("waiting{n}"),
            ConfigField::Reconnect => "reconnect".to_string(),
            other => Self::SCALAR
                .iter()
                .find(|(f, _)| f == other)
                .map(|(_, k)| (*k).to_string())
                .unwrap_or_default(),
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl FromStr for ConfigField {
    type Err = CoreError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        if key == "reconnect" {
            return Ok(ConfigField::Reconnect);
        }
        if let Some((field, _)) = Self::SCALAR.iter().find(|(_, k)| *k == key) {
            return Ok(*field);
        }

        let channel_field = |prefix: &str, make: fn(usize) -> ConfigField| {
            key.strip_prefix(prefix)
                .and_then(|n| n.parse::<usize>().ok())
                .filter(|n| (1..=CODE_CHANNELS).contains(n))
                .map(make)
        };

        // "rcl" 접두사가 "rc"보다 먼저 검사되어야 한다
        channel_field("rcl", ConfigField::AltCode)
            .or_else(|| channel_field("rc", ConfigField::Code))
            .or_else(|| channel_field("attack", ConfigField::Attack))
            .or_else(|| channel_field("waiting", ConfigField::Waiting))
            .ok_or_else(|| CoreError::validation(key, "알 수 없는 설정 키"))
    }
}

/// 패널 설정: 편집 가능한 전체 백엔드 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireConfig", into = "WireConfig")]
pub struct PanelConfig {
    /// 코드 채널 1..=4
    pub channels: [ChannelSettings; CODE_CHANNELS],
    /// 킥 채널 코드
    pub kick_code: String,
    /// 이동 목표 행성
    pub planet: String,
    pub device: DeviceProfile,
    pub mode: OperationalMode,
    pub kick_strategy: KickStrategy,
    pub auto_release: bool,
    pub smart: bool,
    pub low_sec_mode: bool,
    pub modena: bool,
    pub blacklist: String,
    pub gang_blacklist: String,
    pub kick_blacklist: String,
    pub kick_gang_blacklist: String,
    /// 자동 간격 조정 사용
    pub timer_shift: bool,
    pub increment_value: i64,
    pub decrement_value: i64,
    pub min_attack: i64,
    pub max_attack: i64,
    pub min_defense: i64,
    pub max_defense: i64,
    /// 재연결 지연 (ms)
    pub reconnect_ms: i64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            channels: Default::default(),
            kick_code: String::new(),
            planet: String::new(),
            device: DeviceProfile::default(),
            mode: OperationalMode::default(),
            kick_strategy: KickStrategy::default(),
            auto_release: false,
            smart: false,
            low_sec_mode: false,
            modena: false,
            blacklist: String::new(),
            gang_blacklist: String::new(),
            kick_blacklist: String::new(),
            kick_gang_blacklist: String::new(),
            timer_shift: false,
            increment_value: 10,
            decrement_value: 10,
            min_attack: 1000,
            max_attack: 3000,
            min_defense: 1000,
            max_defense: 3000,
            reconnect_ms: 5000,
        }
    }
}

fn expect_text(field: ConfigField, value: FieldValue) -> Result<String, CoreError> {
    match value {
        FieldValue::Text(s) => Ok(s),
        other => Err(type_mismatch(field, "text", &other)),
    }
}

fn expect_int(field: ConfigField, value: FieldValue) -> Result<i64, CoreError> {
    match value {
        FieldValue::Int(n) => Ok(n),
        other => Err(type_mismatch(field, "int", &other)),
    }
}

fn expect_bool(field: ConfigField, value: FieldValue) -> Result<bool, CoreError> {
    match value {
        FieldValue::Bool(b) => Ok(b),
        other => Err(type_mismatch(field, "bool", &other)),
    }
}

fn type_mismatch(field: ConfigField, expected: &str, actual: &FieldValue) -> CoreError {
    CoreError::validation(
        field.key(),
        format!("{expected} 값이 필요하지만 {} 값을 받음", actual.kind()),
    )
}

fn expect_code(field: ConfigField, value: FieldValue) -> Result<String, CoreError> {
    let code = expect_text(field, value)?;
    if code.chars().count() > MAX_CODE_LEN {
        return Err(CoreError::validation(
            field.key(),
            format!("코드는 최대 {MAX_CODE_LEN}자"),
        ));
    }
    Ok(code)
}

impl PanelConfig {
    fn channel(&self, n: usize) -> Result<&ChannelSettings, CoreError> {
        n.checked_sub(1)
            .and_then(|i| self.channels.get(i))
            .ok_or_else(|| CoreError::validation(format!("channel{n}"), "채널 범위 초과"))
    }

    fn channel_mut(&mut self, n: usize) -> Result<&mut ChannelSettings, CoreError> {
        n.checked_sub(1)
            .and_then(|i| self.channels.get_mut(i))
            .ok_or_else(|| CoreError::validation(format!("channel{n}"), "채널 범위 초과"))
    }

    /// 필드 현재 값 조회
    pub fn get(&self, field: ConfigField) -> Result<FieldValue, CoreError> {
        let value = match field {
            ConfigField::Code(n) => self.channel(n)?.code.clone().into(),
            ConfigField::AltCode(n) => self.channel(n)?.alt_code.clone().into(),
            ConfigField::Attack(n) => self.channel(n)?.attack.into(),
            ConfigField::Waiting(n) => self.channel(n)?.waiting.into(),
            ConfigField::KickCode => self.kick_code.clone().into(),
            ConfigField::Planet => self.planet.clone().into(),
            ConfigField::Device => self.device.code().into(),
            ConfigField::AutoRelease => self.auto_release.into(),
            ConfigField::Smart => self.smart.into(),
            ConfigField::LowSecMode => self.low_sec_mode.into(),
            ConfigField::Exiting => (self.mode == OperationalMode::Exit).into(),
            ConfigField::Sleeping => (self.mode == OperationalMode::Sleep).into(),
            ConfigField::KickMode
            | ConfigField::KickAll
            | ConfigField::KickByBlacklist
            | ConfigField::DadPlus => (self.kick_strategy.flag() == Some(field)).into(),
            ConfigField::Modena => self.modena.into(),
            ConfigField::Blacklist => self.blacklist.clone().into(),
            ConfigField::GangBlacklist => self.gang_blacklist.clone().into(),
            ConfigField::KickBlacklist => self.kick_blacklist.clone().into(),
            ConfigField::KickGangBlacklist => self.kick_gang_blacklist.clone().into(),
            ConfigField::TimerShift => self.timer_shift.into(),
            ConfigField::IncrementValue => self.increment_value.into(),
            ConfigField::DecrementValue => self.decrement_value.into(),
            ConfigField::MinAttack => self.min_attack.into(),
            ConfigField::MaxAttack => self.max_attack.into(),
            ConfigField::MinDefense => self.min_defense.into(),
            ConfigField::MaxDefense => self.max_defense.into(),
            ConfigField::Reconnect => self.reconnect_ms.into(),
        };
        Ok(value)
    }

    /// 필드 하나를 변경한다. 타입이 맞지 않으면 아무것도 바꾸지 않고 에러를 반환한다.
    pub fn set(&mut self, field: ConfigField, value: FieldValue) -> Result<(), CoreError> {
        match field {
            ConfigField::Code(n) => {
                let code = expect_code(field, value)?;
                self.channel_mut(n)?.code = code;
            }
            ConfigField::AltCode(n) => {
                let code = expect_code(field, value)?;
                self.channel_mut(n)?.alt_code = code;
            }
            ConfigField::Attack(n) => {
                let v = expect_int(field, value)?;
                self.channel_mut(n)?.attack = v;
            }
            ConfigField::Waiting(n) => {
                let v = expect_int(field, value)?;
                self.channel_mut(n)?.waiting = v;
            }
            ConfigField::KickCode => self.kick_code = expect_code(field, value)?,
            ConfigField::Planet => self.planet = expect_text(field, value)?,
            ConfigField::Device => self.device = expect_text(field, value)?.parse()?,
            ConfigField::AutoRelease => self.auto_release = expect_bool(field, value)?,
            ConfigField::Smart => self.smart = expect_bool(field, value)?,
            ConfigField::LowSecMode => self.low_sec_mode = expect_bool(field, value)?,
            ConfigField::Exiting | ConfigField::Sleeping => {
                let on = expect_bool(field, value)?;
                let target = if field == ConfigField::Exiting {
                    OperationalMode::Exit
                } else {
                    OperationalMode::Sleep
                };
                if on {
                    self.mode = target;
                } else if self.mode == target {
                    self.mode = OperationalMode::Off;
                }
            }
            ConfigField::KickMode
            | ConfigField::KickAll
            | ConfigField::KickByBlacklist
            | ConfigField::DadPlus => {
                let on = expect_bool(field, value)?;
                let target = match field {
                    ConfigField::KickMode => KickStrategy::Kick,
                    ConfigField::KickAll => KickStrategy::Everyone,
                    ConfigField::KickByBlacklist => KickStrategy::ByBlacklist,
                    _ => KickStrategy::DadPlus,
                };
                if on {
                    self.kick_strategy = target;
                } else if self.kick_strategy == target {
                    self.kick_strategy = KickStrategy::None;
                }
            }
            ConfigField::Modena => self.modena = expect_bool(field, value)?,
            ConfigField::Blacklist => self.blacklist = expect_text(field, value)?,
            ConfigField::GangBlacklist => self.gang_blacklist = expect_text(field, value)?,
            ConfigField::KickBlacklist => self.kick_blacklist = expect_text(field, value)?,
            ConfigField::KickGangBlacklist => {
                self.kick_gang_blacklist = expect_text(field, value)?
            }
            ConfigField::TimerShift => self.timer_shift = expect_bool(field, value)?,
            ConfigField::IncrementValue => self.increment_value = expect_int(field, value)?,
            ConfigField::DecrementValue => self.decrement_value = expect_int(field, value)?,
            ConfigField::MinAttack => self.min_attack = expect_int(field, value)?,
            ConfigField::MaxAttack => self.max_attack = expect_int(field, value)?,
            ConfigField::MinDefense => self.min_defense = expect_int(field, value)?,
            ConfigField::MaxDefense => self.max_defense = expect_int(field, value)?,
            ConfigField::Reconnect => self.reconnect_ms = expect_int(field, value)?,
        }
        Ok(())
    }

    /// 변경을 적용한 사본을 반환한다 (원본은 그대로)
    pub fn with_field(&self, field: ConfigField, value: FieldValue) -> Result<Self, CoreError> {
        let mut next = self.clone();
        next.set(field, value)?;
        Ok(next)
    }

    /// 모든 식별 코드 (기본 코드, 대체 코드, 킥 코드): 빈 값 포함
    pub fn identity_codes(&self) -> Vec<(ConfigField, &str)> {
        let mut codes = Vec::with_capacity(CODE_CHANNELS * 2 + 1);
        for (i, ch) in self.channels.iter().enumerate() {
            codes.push((ConfigField::Code(i + 1), ch.code.as_str()));
            codes.push((ConfigField::AltCode(i + 1), ch.alt_code.as_str()));
        }
        codes.push((ConfigField::KickCode, self.kick_code.as_str()));
        codes
    }
}

/// 백엔드 전송 형식 (평면 키)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct WireConfig {
    rc1: String,
    rc2: String,
    rc3: String,
    rc4: String,
    kickrc: String,
    rcl1: String,
    rcl2: String,
    rcl3: String,
    rcl4: String,
    planet: String,
    device: DeviceProfile,
    autorelease: bool,
    smart: bool,
    lowsecmode: bool,
    exitting: bool,
    sleeping: bool,
    kickmode: bool,
    blacklist: String,
    gangblacklist: String,
    kblacklist: String,
    kgangblacklist: String,
    attack1: i64,
    attack2: i64,
    attack3: i64,
    attack4: i64,
    waiting1: i64,
    waiting2: i64,
    waiting3: i64,
    waiting4: i64,
    timershift: bool,
    incrementvalue: i64,
    decrementvalue: i64,
    minatk: i64,
    maxatk: i64,
    mindef: i64,
    maxdef: i64,
    modena: bool,
    kickbybl: bool,
    dadplus: bool,
    kickall: bool,
    reconnect: i64,
}

impl Default for WireConfig {
    fn default() -> Self {
        PanelConfig::default().into()
    }
}

impl From<PanelConfig> for WireConfig {
    fn from(c: PanelConfig) -> Self {
        let [c1, c2, c3, c4] = c.channels;
        Self {
            rc1: c1.code,
            rc2: c2.code,
            rc3: c3.code,
            rc4: c4.code,
            kickrc: c.kick_code,
            rcl1: c1.alt_code,
            rcl2: c2.alt_code,
            rcl3: c3.alt_code,
            rcl4: c4.alt_code,
            planet: c.planet,
            device: c.device,
            autorelease: c.auto_release,
            smart: c.smart,
            lowsecmode: c.low_sec_mode,
            exitting: c.mode == OperationalMode::Exit,
            sleeping: c.mode == OperationalMode::Sleep,
            kickmode: c.kick_strategy == KickStrategy::Kick,
            blacklist: c.blacklist,
            gangblacklist: c.gang_blacklist,
            kblacklist: c.kick_blacklist,
            kgangblacklist: c.kick_gang_blacklist,
            attack1: c1.attack,
            attack2: c2.attack,
            attack3: c3.attack,
            attack4: c4.attack,
            waiting1: c1.waiting,
            waiting2: c2.waiting,
            waiting3: c3.waiting,
            waiting4: c4.waiting,
            timershift: c.timer_shift,
            incrementvalue: c.increment_value,
            decrementvalue: c.decrement_value,
            minatk: c.min_attack,
            maxatk: c.max_attack,
            mindef: c.min_defense,
            maxdef: c.max_defense,
            modena: c.modena,
            kickbybl: c.kick_strategy == KickStrategy::ByBlacklist,
            dadplus: c.kick_strategy == KickStrategy::DadPlus,
            kickall: c.kick_strategy == KickStrategy::Everyone,
            reconnect: c.reconnect_ms,
        }
    }
}

impl From<WireConfig> for PanelConfig {
    fn from(w: WireConfig) -> Self {
        let channel = |code: String, alt_code: String, attack: i64, waiting: i64| ChannelSettings {
            code,
            alt_code,
            attack,
            waiting,
        };
        let mode = if w.exitting {
            OperationalMode::Exit
        } else if w.sleeping {
            OperationalMode::Sleep
        } else {
            OperationalMode::Off
        };

        Self {
            channels: [
                channel(w.rc1, w.rcl1, w.attack1, w.waiting1),
                channel(w.rc2, w.rcl2, w.attack2, w.waiting2),
                channel(w.rc3, w.rcl3, w.attack3, w.waiting3),
                channel(w.rc4, w.rcl4, w.attack4, w.waiting4),
            ],
            kick_code: w.kickrc,
            planet: w.planet,
            device: w.device,
            mode,
            kick_strategy: KickStrategy::from_flags(w.kickmode, w.kickall, w.kickbybl, w.dadplus),
            auto_release: w.autorelease,
            smart: w.smart,
            low_sec_mode: w.lowsecmode,
            modena: w.modena,
            blacklist: w.blacklist,
            gang_blacklist: w.gangblacklist,
            kick_blacklist: w.kblacklist,
            kick_gang_blacklist: w.kgangblacklist,
            timer_shift: w.timershift,
            increment_value: w.incrementvalue,
            decrement_value: w.decrementvalue,
            min_attack: w.minatk,
            max_attack: w.maxatk,
            min_defense: w.mindef,
            max_defense: w.maxdef,
            reconnect_ms: w.reconnect,
        }
    }
}
