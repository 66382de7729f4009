//! Fixed meeting taxonomy shared by the intent parser and the rule engine

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Top-level meeting category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Category {
    #[serde(rename = "스포츠")]
    Sports,
    #[serde(rename = "맛집")]
    Food,
    #[serde(rename = "카페")]
    Cafe,
    #[serde(rename = "문화예술")]
    CultureArts,
    #[serde(rename = "스터디")]
    Study,
    #[serde(rename = "취미활동")]
    Hobby,
    #[serde(rename = "소셜")]
    Social,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Sports,
        Category::Food,
        Category::Cafe,
        Category::CultureArts,
        Category::Study,
        Category::Hobby,
        Category::Social,
    ];

    /// Korean label used on the wire and in meeting records
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Sports => "스포츠",
            Category::Food => "맛집",
            Category::Cafe => "카페",
            Category::CultureArts => "문화예술",
            Category::Study => "스터디",
            Category::Hobby => "취미활동",
            Category::Social => "소셜",
        }
    }

    /// Parse a category label. Surrounding whitespace is ignored.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }

    /// Known subcategories of this category
    pub fn subcategories(&self) -> &'static [&'static str] {
        match self {
            Category::Sports => &[
                "러닝",
                "등산",
                "축구",
                "농구",
                "배드민턴",
                "테니스",
                "요가",
                "필라테스",
                "헬스",
                "사이클링",
                "클라이밍",
            ],
            Category::Food => &[
                "한식",
                "중식",
                "일식",
                "양식",
                "카페",
                "디저트",
                "술집",
                "이자카야",
                "맛집투어",
            ],
            Category::Cafe => &["카페투어", "브런치", "디저트", "베이커리", "티하우스"],
            Category::CultureArts => &[
                "전시회",
                "공연",
                "갤러리",
                "공방체험",
                "사진촬영",
                "버스킹",
            ],
            Category::Study => &["영어회화", "독서토론", "코딩", "재테크", "자격증", "세미나"],
            Category::Hobby => &["그림", "베이킹", "쿠킹", "플라워", "캘리그라피", "댄스"],
            Category::Social => &[
                "보드게임",
                "방탈출",
                "볼링",
                "당구",
                "탁구",
                "노래방",
                "와인바",
                "기타",
            ],
        }
    }

    pub fn has_subcategory(&self, subcategory: &str) -> bool {
        self.subcategories().contains(&subcategory)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Preferred time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
}

impl TimeSlot {
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "morning" => Some(TimeSlot::Morning),
            "afternoon" => Some(TimeSlot::Afternoon),
            "evening" => Some(TimeSlot::Evening),
            _ => None,
        }
    }
}

/// Indoor or outdoor venue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum LocationType {
    Indoor,
    Outdoor,
}

impl LocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Indoor => "INDOOR",
            LocationType::Outdoor => "OUTDOOR",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("INDOOR") {
            Some(LocationType::Indoor)
        } else if label.eq_ignore_ascii_case("OUTDOOR") {
            Some(LocationType::Outdoor)
        } else {
            None
        }
    }

    /// Case-insensitive comparison against a free-form label from a meeting record
    pub fn matches(&self, label: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(label.trim())
    }
}

/// Mood taxonomy (exactly eight values)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Vibe {
    #[serde(rename = "활기찬")]
    Lively,
    #[serde(rename = "여유로운")]
    Relaxed,
    #[serde(rename = "힐링")]
    Healing,
    #[serde(rename = "진지한")]
    Serious,
    #[serde(rename = "즐거운")]
    Fun,
    #[serde(rename = "감성적인")]
    Emotional,
    #[serde(rename = "건강한")]
    Healthy,
    #[serde(rename = "배움")]
    Learning,
}

impl Vibe {
    pub const ALL: [Vibe; 8] = [
        Vibe::Lively,
        Vibe::Relaxed,
        Vibe::Healing,
        Vibe::Serious,
        Vibe::Fun,
        Vibe::Emotional,
        Vibe::Healthy,
        Vibe::Learning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Vibe::Lively => "활기찬",
            Vibe::Relaxed => "여유로운",
            Vibe::Healing => "힐링",
            Vibe::Serious => "진지한",
            Vibe::Fun => "즐거운",
            Vibe::Emotional => "감성적인",
            Vibe::Healthy => "건강한",
            Vibe::Learning => "배움",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|v| v.as_str() == label)
    }
}
