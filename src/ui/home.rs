//! Home view: hero, phases, vision, call-to-action and footer

use crate::app::App;
use crate::state::Anchor;
use chrono::{Datelike, Local};
use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

struct Phase {
    icon: &'static str,
    title: &'static str,
    description: &'static [&'static str],
}

const PHASES: [Phase; 7] = [
    Phase {
        icon: "🧭",
        title: "興味・関心の発見",
        description: &[
            "地域×AIの可能性に気づく。あなたの関心や課題意識が",
            "コミュニティとつながる第一歩",
        ],
    },
    Phase {
        icon: "👥",
        title: "コミュニティ参加",
        description: &[
            "オンラインMeetupやDiscordで仲間と出会う。",
            "多様な背景を持つメンバーとの交流が始まり",
        ],
    },
    Phase {
        icon: "📚",
        title: "学び・スキル習得",
        description: &[
            "仲間と一緒にAIスキルを身につける。",
            "ワークショップや勉強会で実践的な知識を共有",
        ],
    },
    Phase {
        icon: "💡",
        title: "プロジェクト創出",
        description: &[
            "コラボレーションでアイデアを形に。異なる専門性を持つ",
            "メンバーとの共創でプロジェクトが生まれる",
        ],
    },
    Phase {
        icon: "🚀",
        title: "実践・インパクト創出",
        description: &[
            "地域での実装・実証実験。プロジェクトを実際に地域に",
            "展開し、社会的インパクトを生み出す",
        ],
    },
    Phase {
        icon: "📈",
        title: "AIマーケティング応用",
        description: &[
            "最新のAI手法でマーケティングを強化。",
            "データ分析からコンテンツ生成まで実践的なスキルを習得",
        ],
    },
    Phase {
        icon: "💻",
        title: "Vibecoding開発",
        description: &[
            "音楽・感情とコードの融合開発。最新のクリエイティブ",
            "テクノロジーで表現の可能性を広げる",
        ],
    },
];

const VISION_GOALS: [&str; 4] = [
    "全国47都道府県での地域×AIプロジェクト実現",
    "コミュニティメンバー1万人突破",
    "年間100件の地域課題解決事例創出",
    "地域発AIスタートアップ500社輩出",
];

/// Rendered home content plus where each anchor starts
pub struct HomeContent {
    lines: Vec<Line<'static>>,
    anchors: Vec<(Anchor, u16)>,
}

impl HomeContent {
    pub fn build() -> Self {
        let mut content = Self {
            lines: Vec::new(),
            anchors: Vec::new(),
        };
        content.hero();
        content.phases();
        content.vision();
        content.cta();
        content.footer();
        content
    }

    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    pub fn line_count(&self) -> u16 {
        self.lines.len() as u16
    }

    /// First line of the section `anchor` names
    pub fn anchor_line(&self, anchor: Anchor) -> u16 {
        self.anchors
            .iter()
            .find(|(a, _)| *a == anchor)
            .map(|(_, line)| *line)
            .unwrap_or(0)
    }

    fn mark(&mut self, anchor: Anchor) {
        self.anchors.push((anchor, self.line_count()));
    }

    fn blank(&mut self) {
        self.lines.push(Line::from(""));
    }

    fn heading(&mut self, text: &'static str) {
        self.lines.push(Line::from(Span::styled(
            text,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        self.blank();
    }

    fn text(&mut self, text: &'static str) {
        self.lines.push(Line::from(text));
    }

    fn hero(&mut self) {
        self.mark(Anchor::Concept);
        let accent = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        self.lines.push(Line::from(vec![
            Span::styled("AIの力で", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled("地域", accent),
            Span::styled("と", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled("人生", accent),
            Span::styled("を変える", Style::default().add_modifier(Modifier::BOLD)),
        ]));
        self.blank();
        self.text("地域おこし協力隊が生成AIを活用し「地域課題の解決力」と");
        self.text("「自己実現力」を高める。未来をデザインする実践型プログラム。");
        self.blank();
        self.lines.push(Line::from(vec![
            Span::styled("[2] プログラム詳細 ›", Style::default().fg(Color::Cyan)),
            Span::raw("   "),
            Span::styled("[c] 今すぐ相談する", Style::default().fg(Color::Magenta)),
        ]));
        self.blank();
        self.blank();
    }

    fn phases(&mut self) {
        self.mark(Anchor::Phases);
        self.heading("コミュニティ参加の7ステップ");
        self.text("興味・関心からスタートして、仲間と学び、プロジェクトを創出。");
        self.text("最新のAI技術まで習得できる段階的な成長プロセス");
        self.blank();

        for (number, phase) in PHASES.iter().enumerate() {
            self.lines.push(Line::from(vec![
                Span::styled(
                    format!("Phase {number} "),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(format!("{} ", phase.icon)),
                Span::styled(phase.title, Style::default().add_modifier(Modifier::BOLD)),
            ]));
            for line in phase.description {
                self.lines.push(Line::from(format!("    {line}")));
            }
            self.blank();
        }
        self.text("各ステップの詳細カリキュラムや、追加の専門講座についてご紹介します");
        self.blank();
        self.blank();
    }

    fn vision(&mut self) {
        self.mark(Anchor::Vision);
        self.heading("コミュニティが描く未来像");
        self.lines.push(Line::from(Span::styled(
            "日本全国に変革の波を起こす",
            Style::default().add_modifier(Modifier::ITALIC),
        )));
        self.blank();
        self.text("このコミュニティから巣立った人たちが、各地域でAIを活用した");
        self.text("革新的なプロジェクトを展開。地域課題の解決から新産業の創出まで、");
        self.text("テクノロジーと地域の力を掛け合わせた新しい日本の創造を目指しています。");
        self.blank();
        self.lines.push(Line::from(Span::styled(
            "2030年までの目標",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for goal in VISION_GOALS {
            self.lines.push(Line::from(vec![
                Span::styled("  ✓ ", Style::default().fg(Color::Green)),
                Span::raw(goal),
            ]));
        }
        self.blank();
        self.blank();
    }

    fn cta(&mut self) {
        self.mark(Anchor::Cta);
        self.heading("AIで地域の未来をデザインしませんか？");
        self.text("地域でAI事業を始めたい方、技術で社会課題を解決したいエンジニア、");
        self.text("民間連携を模索する自治体の方、地域起業を支援したい投資家の方。");
        self.text("あなたのアイデアと情熱が、地域の未来を変える第一歩になります。");
        self.blank();
        self.lines.push(Line::from(Span::styled(
            "[c] お問い合わせフォームへ ✉",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )));
        self.blank();
        self.blank();
    }

    fn footer(&mut self) {
        let dim = Style::default().fg(Color::DarkGray);
        self.lines.push(Line::from(Span::styled("─".repeat(48), dim)));
        self.lines.push(Line::from(Span::styled(
            "AI時代の地域活性化をリードする人材育成プログラム。",
            dim,
        )));
        self.lines.push(Line::from(Span::styled(
            "地域とあなたの未来を、共にデザインしましょう。",
            dim,
        )));
        self.blank();
        let links: Vec<String> = Anchor::ALL
            .iter()
            .map(|a| format!("[{}] {}", a.shortcut(), a.label()))
            .chain(std::iter::once("[c] お問い合わせ".to_string()))
            .collect();
        self.lines
            .push(Line::from(Span::styled(links.join("  "), dim)));
        self.lines.push(Line::from(Span::styled(
            format!(
                "© {} 地域おこし協力隊 × 生成AIラボ All Rights Reserved.",
                Local::now().year()
            ),
            dim,
        )));
    }
}

/// Draw the home view at the current scroll offset
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let content = HomeContent::build();
    let scroll = app.state.home_scroll.min(content.line_count().saturating_sub(1));

    let paragraph = Paragraph::new(content.lines().to_vec())
        .scroll((scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(paragraph, area);

    let mut scrollbar_state =
        ScrollbarState::new(content.line_count() as usize).position(scroll as usize);
    frame.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight),
        area.inner(Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut scrollbar_state,
    );
}
