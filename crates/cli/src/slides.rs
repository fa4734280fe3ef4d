//! Slide assembly: one procedure per slide plus the literal deck content.
//!
//! Every procedure works on a fresh blank slide. Body slides share the
//! title strip and footer; the page number is the only value handed in
//! from outside.

use deck_core::layout::{self, Card, Cursor};
use deck_core::{theme, Alignment, Length, Outline, Rect, Slide, Style};

use crate::deck::{Assets, Deck};

pub const DECK_TITLE: &str = "C语言代码相似度检测系统";

/// Builds one numbered body slide.
type Assembler = fn(&mut Slide, u32, &Assets);

/// Body slides in narrative order; they are numbered from 1.
const BODY_SLIDES: [Assembler; 9] = [
    background,
    architecture,
    preprocessing,
    vectorization,
    algorithm,
    experiment_design,
    results,
    implementation,
    conclusion,
];

/// Title slide, numbered body slides, closing slide.
pub fn assemble(deck: &mut Deck, assets: &Assets) {
    title(deck.add_slide());
    for (page, build) in (1u32..).zip(BODY_SLIDES) {
        let slide = deck.add_slide();
        build(slide, page, assets);
        log::debug!("Slide {} (page {}): {} shapes", slide.number, page, slide.shape_count());
    }
    closing(deck.add_slide());
}

fn style(size: f64, bold: bool, color: deck_core::Rgb) -> Style {
    Style::new(size, bold, Some(color))
}

fn code_style(size: f64, bold: bool, color: deck_core::Rgb) -> Style {
    style(size, bold, color).with_family(theme::CODE_FONT)
}

/// Title strip plus footer shared by all body slides.
fn chrome(slide: &mut Slide, heading: &str, page: u32) {
    layout::title_strip(slide, heading);
    layout::footer(slide, theme::FOOTER_CAPTION, Some(page));
}

fn title(slide: &mut Slide) {
    layout::panel(
        slide,
        Rect::inches(0.0, 0.0, 3.5, 7.5),
        theme::PRIMARY,
        Outline::Hidden,
        |_| {},
    );

    layout::text_box(slide, Rect::inches(4.0, 2.5, 5.5, 2.0), false, |frame| {
        let heading = frame.first_paragraph_mut();
        heading.line_spacing = Some(1.2);
        layout::fill_paragraph(
            heading,
            "C语言代码\n相似度检测系统",
            &style(36.0, true, theme::TEXT_DARK),
        );
        layout::add_paragraph(
            frame,
            "基于向量空间模型的查重算法实现",
            &style(18.0, false, theme::TEXT_SUBTLE),
            Some(Length::points(12.0)),
        );
    });

    layout::caption(
        slide,
        Rect::inches(4.0, 6.0, 5.5, 1.0),
        "2025年12月19日 | 课程设计答辩",
        &style(14.0, false, theme::TEXT_SOFT),
    );
}

const BACKGROUND: [(&str, &str); 3] = [
    (
        "当前痛点",
        "高校作业抄袭、工程代码重复利用率低，传统的人工比对费时费力。",
    ),
    (
        "现有挑战",
        "简单的文本比对（Diff工具）无法处理格式化、重命名变量、调整函数顺序等修改手段。",
    ),
    (
        "项目目标",
        "实现一个自动化、高鲁棒性的检测工具，关注代码的“逻辑骨架”而非“文本皮囊”。",
    ),
];

fn background(slide: &mut Slide, page: u32, _assets: &Assets) {
    chrome(slide, "项目背景与意义", page);
    layout::bulleted_blocks(slide, &BACKGROUND, Cursor::inches(1.6));
}

const PIPELINE: [&str; 5] = ["源代码输入", "噪声清洗", "特征提取", "空间映射", "距离计算"];

fn architecture(slide: &mut Slide, page: u32, assets: &Assets) {
    chrome(slide, "系统整体架构", page);

    if let Some(flowchart) = &assets.flowchart {
        layout::picture(
            slide,
            flowchart.clone(),
            Length::inches(0.5),
            Length::inches(1.5),
            Length::inches(6.0),
        );
    }

    layout::text_box(slide, Rect::inches(6.8, 2.0, 3.0, 4.0), true, |frame| {
        layout::fill_paragraph(
            frame.first_paragraph_mut(),
            "流程解析",
            &style(16.0, true, theme::PRIMARY),
        );
        layout::bullet_list(
            frame,
            &PIPELINE,
            &style(14.0, false, theme::TEXT_BODY),
            Length::points(12.0),
        );
    });
}

const RAW_CODE: &str = "// Calculate sum\nint main() {\n  int a = 10; /* Init */\n  return a + 5;\n}";
const CLEANED_CODE: &str = "int main ( ) { int a = ; return a + ; }";

fn preprocessing(slide: &mut Slide, page: u32, _assets: &Assets) {
    chrome(slide, "关键技术一：预处理", page);

    layout::caption(
        slide,
        Rect::inches(0.8, 1.3, 8.5, 0.5),
        "目的：消除代码风格差异，还原代码最纯粹的逻辑形态。",
        &style(16.0, false, theme::TEXT_DARK),
    );
    layout::comparison_panel(slide, RAW_CODE, CLEANED_CODE, Length::inches(2.2));
    layout::caption(
        slide,
        Rect::inches(0.8, 5.5, 8.5, 1.0),
        "处理动作：\n1. 移除所有注释\n2. 压缩空白字符\n3. 移除字符串/数字常量",
        &style(14.0, true, theme::TEXT_MUTED),
    );
}

fn vectorization(slide: &mut Slide, page: u32, _assets: &Assets) {
    chrome(slide, "关键技术二：特征向量化", page);

    layout::text_box(slide, Rect::inches(0.8, 1.3, 8.5, 0.8), true, |frame| {
        layout::fill_paragraph(
            frame.first_paragraph_mut(),
            "策略：采用词袋模型 (Bag of Words)，忽略变量名，关注保留字与运算符。",
            &style(16.0, false, theme::TEXT_DARK),
        );
    });

    layout::panel(
        slide,
        Rect::inches(0.8, 2.3, 8.5, 1.5),
        theme::PANEL_WARM,
        Outline::Solid {
            color: theme::PANEL_WARM_BORDER,
            width: None,
        },
        |frame| {
            frame.inset_left = Some(Length::inches(0.2));
            layout::fill_paragraph(
                frame.first_paragraph_mut(),
                "特征向量维度 (35维):",
                &style(14.0, true, theme::HIGHLIGHT),
            );
            layout::add_paragraph(
                frame,
                "[int, char, if, else, while, for, return, +, -, *, /, ==, !=, &&, ||, ...]",
                &code_style(12.0, false, theme::BLACK),
                None,
            );
        },
    );

    layout::text_box(slide, Rect::inches(0.8, 4.2, 8.5, 2.5), true, |frame| {
        layout::fill_paragraph(
            frame.first_paragraph_mut(),
            "💡 创新点：为什么要忽略用户自定义变量？",
            &style(16.0, true, theme::PRIMARY),
        );
        let body = style(14.0, false, theme::TEXT_BODY);
        layout::add_paragraph(
            frame,
            "原因：如果两个程序逻辑不同（如冒泡排序 vs 快速排序），但定义了相同数量的变量（i, j, temp），会造成虚假的高相似度。",
            &body,
            Some(Length::points(10.0)),
        );
        layout::add_paragraph(
            frame,
            "效果：忽略变量名后，算法更聚焦于 if/while/for 等控制流结构，准确率显著提升。",
            &body,
            Some(Length::points(6.0)),
        );
    });
}

const COSINE_CASES: [&str; 2] = [
    "夹角为0度 -> 余弦值为1 -> 完全相似",
    "夹角为90度 -> 余弦值为0 -> 完全不相关",
];

fn algorithm(slide: &mut Slide, page: u32, _assets: &Assets) {
    chrome(slide, "核心算法：余弦相似度", page);

    layout::formula_box(
        slide,
        Rect::inches(1.5, 2.0, 7.0, 1.5),
        "Similarity = (A · B) / (||A|| × ||B||)",
    );

    layout::text_box(slide, Rect::inches(1.5, 4.0, 7.0, 2.0), true, |frame| {
        layout::fill_paragraph(
            frame.first_paragraph_mut(),
            "几何意义：",
            &style(16.0, true, theme::PRIMARY),
        );
        let body = style(14.0, false, theme::TEXT_BODY);
        layout::add_paragraph(
            frame,
            "将代码映射为多维空间中的向量，计算两个向量之间的夹角余弦值。",
            &body,
            Some(Length::points(10.0)),
        );
        layout::bullet_list(frame, &COSINE_CASES, &body, Length::points(5.0));
    });
}

/// (group, setup, expected score)
const EXPERIMENTS: [(&str, &str, &str); 3] = [
    (
        "Group 1: 仅修改注释",
        "逻辑完全一致，仅将英文注释改为中文，或删除注释。",
        "预期：100%",
    ),
    (
        "Group 2: 函数乱序",
        "保持所有函数内容不变，仅打乱函数在文件中的定义顺序。",
        "预期：100%",
    ),
    (
        "Group 3: 不同算法",
        "完全不同的任务（如：冒泡排序 vs 斐波那契数列）。",
        "预期：< 60%",
    ),
];

fn experiment_design(slide: &mut Slide, page: u32, _assets: &Assets) {
    chrome(slide, "实验设计与验证", page);

    layout::caption(
        slide,
        Rect::inches(0.8, 1.3, 8.5, 0.5),
        "为了验证鲁棒性，设计了三组对照实验：",
        &style(16.0, false, theme::TEXT_DARK),
    );

    let outcomes: Vec<String> = EXPERIMENTS
        .iter()
        .map(|(_, _, expected)| format!("目标结果: {}", expected))
        .collect();
    let cards: Vec<Card<'_>> = EXPERIMENTS
        .iter()
        .zip(&outcomes)
        .map(|(&(title, description, _), outcome)| Card {
            title,
            description,
            outcome,
        })
        .collect();
    layout::card_stack(slide, &cards, Cursor::inches(2.2));
}

const RESULT_HEADERS: [&str; 4] = ["测试组", "对比文件", "相似度得分", "判定结论"];

const RESULT_ROWS: [[&str; 4]; 3] = [
    ["Group 1", "test1.c / test2.c", "1.0000", "极高相似 (抄袭)"],
    ["Group 2", "test3.c / test4.c", "1.0000", "极高相似 (抄袭)"],
    ["Group 3", "test5.c / test6.c", "0.5824", "低相似 (安全)"],
];

const RESULT_NOTES: [&str; 3] = [
    "Group 1 (1.0000): 系统成功过滤了所有注释，验证了预处理模块的有效性。",
    "Group 2 (1.0000): 词袋模型忽略了代码顺序，因此简单的函数重排无法欺骗检测系统。",
    "Group 3 (0.5824): 对于完全不同的算法，即使共享基础关键字，得分依然显著偏低，区分度良好。",
];

fn results(slide: &mut Slide, page: u32, _assets: &Assets) {
    chrome(slide, "实验结果分析", page);

    layout::data_table(
        slide,
        Rect::inches(0.5, 1.8, 9.0, 2.2),
        &RESULT_HEADERS,
        &RESULT_ROWS,
    );

    layout::text_box(slide, Rect::inches(0.5, 4.5, 9.0, 2.0), false, |frame| {
        layout::fill_paragraph(
            frame.first_paragraph_mut(),
            "数据解读：",
            &style(14.0, true, theme::ACCENT),
        );
        layout::bullet_list(
            frame,
            &RESULT_NOTES,
            &style(12.0, false, theme::TEXT_BODY),
            Length::points(8.0),
        );
    });
}

const TECH_STACK: [&str; 4] = [
    "开发语言: C (Standard C11)",
    "编译工具: GCC / Makefile",
    "内存管理: 手动 (malloc/free)",
    "项目架构: 模块化 (头文件分离)",
];

const DEMO_COMMAND: &str = "> ./code_checker test1.c test2.c";
const DEMO_OUTPUT: &str = "\n[INFO] Reading files...\n[INFO] Preprocessing...\n[INFO] Vectorizing...\n------------------------------\n[RESULT] Similarity: 1.0000\n[CONCLUSION] High Resemblance.";

fn implementation(slide: &mut Slide, page: u32, _assets: &Assets) {
    chrome(slide, "工程实现与演示", page);

    layout::panel(
        slide,
        Rect::inches(0.5, 1.8, 4.0, 2.5),
        theme::PANEL_COOL,
        Outline::Solid {
            color: theme::PANEL_COOL_BORDER,
            width: None,
        },
        |frame| {
            frame.inset_left = Some(Length::inches(0.2));
            frame.inset_top = Some(Length::inches(0.2));
            layout::fill_paragraph(
                frame.first_paragraph_mut(),
                "技术栈",
                &style(14.0, true, theme::PRIMARY),
            );
            layout::bullet_list(
                frame,
                &TECH_STACK,
                &style(12.0, false, theme::BLACK),
                Length::points(8.0),
            );
        },
    );

    layout::panel(
        slide,
        Rect::inches(4.8, 1.8, 4.7, 2.5),
        theme::TERMINAL,
        Outline::Theme,
        |frame| {
            frame.inset_left = Some(Length::inches(0.1));
            frame.inset_top = Some(Length::inches(0.1));
            layout::fill_paragraph(
                frame.first_paragraph_mut(),
                DEMO_COMMAND,
                &code_style(12.0, true, theme::TERMINAL_PROMPT),
            );
            layout::add_paragraph(
                frame,
                DEMO_OUTPUT,
                &code_style(10.0, false, theme::RULE),
                None,
            );
        },
    );
}

const FUTURE_WORK: [&str; 3] = [
    "引入 抽象语法树 (AST): 检测更复杂的逻辑修改（如 while 转 for）。",
    "变量依赖分析: 防止恶意的变量名整体替换。",
    "多语言支持: 扩展对 Python, Java 等语言的解析支持。",
];

fn conclusion(slide: &mut Slide, page: u32, _assets: &Assets) {
    chrome(slide, "总结与展望", page);

    layout::text_box(slide, Rect::inches(0.8, 1.5, 8.5, 2.0), false, |frame| {
        layout::fill_paragraph(
            frame.first_paragraph_mut(),
            "项目总结",
            &style(18.0, true, theme::PRIMARY),
        );
        layout::add_paragraph(
            frame,
            "本项目成功实现了一个基于特征向量的高效代码查重工具。相比传统文本比对，它更能抵抗格式化、注释修改等干扰手段，具有较高的鲁棒性和实用价值。",
            &style(14.0, false, theme::TEXT_BODY),
            Some(Length::points(12.0)),
        );
    });

    layout::text_box(slide, Rect::inches(0.8, 4.0, 8.5, 2.5), false, |frame| {
        layout::fill_paragraph(
            frame.first_paragraph_mut(),
            "未来改进方向",
            &style(18.0, true, theme::HIGHLIGHT),
        );
        layout::bullet_list(
            frame,
            &FUTURE_WORK,
            &style(14.0, false, theme::TEXT_BODY),
            Length::points(10.0),
        );
    });
}

fn closing(slide: &mut Slide) {
    layout::text_box(slide, Rect::inches(0.0, 3.0, 10.0, 1.5), false, |frame| {
        let paragraph = frame.first_paragraph_mut();
        paragraph.alignment = Some(Alignment::Center);
        layout::fill_paragraph(
            paragraph,
            "感谢聆听\n请老师批评指正",
            &style(32.0, true, theme::PRIMARY),
        );
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck;
    use deck_core::{Presentation, ShapeKind};

    fn built() -> Presentation {
        deck::assemble(&Assets::default()).presentation().clone()
    }

    #[test]
    fn test_deck_has_eleven_slides_in_order() {
        let pres = built();
        assert_eq!(pres.slide_count(), 11);
        let openers: Vec<String> = pres
            .slides()
            .iter()
            .skip(1)
            .take(9)
            .map(|s| s.texts()[0].clone())
            .collect();
        assert_eq!(
            openers,
            vec![
                "项目背景与意义",
                "系统整体架构",
                "关键技术一：预处理",
                "关键技术二：特征向量化",
                "核心算法：余弦相似度",
                "实验设计与验证",
                "实验结果分析",
                "工程实现与演示",
                "总结与展望",
            ]
        );
    }

    #[test]
    fn test_body_slides_are_numbered_from_one() {
        let pres = built();
        for (idx, slide) in pres.slides().iter().enumerate() {
            let texts = slide.texts();
            let has_footer = texts.iter().any(|t| t == theme::FOOTER_CAPTION);
            if idx == 0 || idx == 10 {
                assert!(!has_footer, "slide {} has a footer", slide.number);
            } else {
                assert!(has_footer);
                assert_eq!(texts[2], idx.to_string());
            }
        }
    }

    #[test]
    fn test_shape_counts_per_slide() {
        let counts: Vec<usize> = built().slides().iter().map(|s| s.shape_count()).collect();
        assert_eq!(counts, vec![3, 14, 6, 10, 8, 7, 9, 7, 7, 7, 1]);
    }

    #[test]
    fn test_results_table_matches_content() {
        let pres = built();
        let table = pres.slides()[7]
            .shapes()
            .iter()
            .find_map(|s| s.as_table())
            .unwrap();
        assert_eq!(table.row_count(), 4);
        assert_eq!(table.column_count(), 4);
        let header: Vec<String> = (0..4)
            .map(|c| table.cell(0, c).unwrap().text.text())
            .collect();
        assert_eq!(header, RESULT_HEADERS);
        let first: Vec<String> = (0..4)
            .map(|c| table.cell(1, c).unwrap().text.text())
            .collect();
        assert_eq!(first, RESULT_ROWS[0]);
        assert_eq!(table.cell(0, 0).unwrap().fill, Some(theme::PRIMARY));
        assert_eq!(table.cell(1, 0).unwrap().fill, None);
    }

    #[test]
    fn test_title_slide_has_no_chrome() {
        let pres = built();
        let slide = &pres.slides()[0];
        assert_eq!(slide.texts()[0], "C语言代码\n相似度检测系统\n基于向量空间模型的查重算法实现");
        match &slide.shapes()[0].kind {
            ShapeKind::AutoShape(panel) => assert_eq!(panel.fill, Some(theme::PRIMARY)),
            other => panic!("expected side panel, got {:?}", other),
        }
    }

    #[test]
    fn test_terminal_output_keeps_line_breaks() {
        let pres = built();
        let terminal = pres.slides()[8].texts()[4].clone();
        assert!(terminal.starts_with(DEMO_COMMAND));
        assert!(terminal.contains("\n\n[INFO] Reading files..."));
        assert!(terminal.ends_with("[CONCLUSION] High Resemblance."));
    }

    #[test]
    fn test_closing_slide_is_centered() {
        let pres = built();
        let slide = &pres.slides()[10];
        let frame = slide.shapes()[0].text_frame().unwrap();
        assert_eq!(frame.paragraphs()[0].alignment, Some(Alignment::Center));
        assert_eq!(frame.text(), "感谢聆听\n请老师批评指正");
    }
}
