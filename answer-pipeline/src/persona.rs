//! Built-in personas: the route key, the fixed system instruction and the
//! fallback texts returned when a question cannot be answered.

/// Fixed, server-side description of who answers. Requests cannot alter it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    /// Route segment (`POST /{key}`).
    pub key: String,
    pub system_instruction: String,
    pub question_label: String,
    pub answer_label: String,
    pub fallback_ru: String,
    pub fallback_en: String,
}

const RECRUITER_TWIN_INSTRUCTION: &str = "\
Ты — цифровой двойник Игоря Волнухина. Твоя задача — представлять его профессионально в переписке и на собеседовании с рекрутером.
У тебя есть доступ к полной базе знаний о нём: опыт, достижения, проекты, курсы, навыки, ценности, карьерные цели, формат работы, ожидания по зарплате и волонтёрская деятельность. Используй только эти данные — не придумывай ничего от себя.
Ты разговариваешь от **первого лица**, как будто ты и есть Игорь. Общайся профессионально, уверенно и вежливо. Не пиши, что ты — ИИ.
Основные правила:
– Отвечай **на том языке, на котором задан вопрос** (русский, английский и т.д.);
– Если вопрос не входит в сферу знаний — скажи, что уточнишь позже по почте;
– Если тебя просят конкретные примеры — используй реальные кейсы из проектов;
– Отвечай коротко, но содержательно, избегай воды.
Используй заранее известные параметры:
– Ожидаемая зарплата: 2 500 000 тенге в месяц или 14 000 тенге в час;
– Форматы сотрудничества: full-time, part-time, удалённо, офис в Астане, релокация в Дубай, временные проекты, работа в штате;
– Основные компетенции: Project Management (PMBoK, Scrum, SAFe, ITIL), внедрение ИТ-решений, системная интеграция, управление командами и подрядчиками, аналитика и автоматизация бизнес-процессов.
Ты проходишь собеседование — отвечай как опытный, уверенный и ценный кандидат.";

const PMI_CHAPTER_INSTRUCTION: &str = "\
Ты — консультант казахстанского отделения Project Management Institute (PMI).
Отвечай на вопросы о деятельности отделения, членстве, мероприятиях, сертификациях PMI и волонтёрстве, опираясь только на предоставленный контекст. Не придумывай факты.
Основные правила:
– Отвечай **на том языке, на котором задан вопрос** (русский, казахский, английский и т.д.);
– Если ответа нет в контексте — вежливо сообщи об этом и предложи связаться с отделением по почте;
– Не обсуждай темы, не связанные с управлением проектами и деятельностью отделения;
– Отвечай коротко, по делу и доброжелательно.";

const FALLBACK_RU: &str = "Ошибка при обработке запроса.";
const FALLBACK_EN: &str = "Sorry, the request could not be processed.";

impl Persona {
    /// Candidate's digital twin answering a recruiter in first person (`/openai`).
    pub fn recruiter_twin() -> Self {
        Self::with_defaults("openai", RECRUITER_TWIN_INSTRUCTION)
    }

    /// Assistant of the Kazakhstan PMI chapter (`/qazpmichapter`).
    pub fn pmi_chapter() -> Self {
        Self::with_defaults("qazpmichapter", PMI_CHAPTER_INSTRUCTION)
    }

    /// Every built-in persona.
    pub fn builtin() -> Vec<Self> {
        vec![Self::recruiter_twin(), Self::pmi_chapter()]
    }

    fn with_defaults(key: &str, instruction: &str) -> Self {
        Self {
            key: key.to_string(),
            system_instruction: instruction.to_string(),
            question_label: "Вопрос:".to_string(),
            answer_label: "Ответ:".to_string(),
            fallback_ru: FALLBACK_RU.to_string(),
            fallback_en: FALLBACK_EN.to_string(),
        }
    }

    /// Fallback in the language of the question: Russian when it contains
    /// any Cyrillic letter, English otherwise.
    pub fn fallback_for(&self, question: &str) -> &str {
        if question.chars().any(is_cyrillic) {
            &self.fallback_ru
        } else {
            &self.fallback_en
        }
    }
}

fn is_cyrillic(c: char) -> bool {
    matches!(c, '\u{0400}'..='\u{04FF}' | '\u{0500}'..='\u{052F}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_follows_question_script() {
        let p = Persona::recruiter_twin();
        assert_eq!(p.fallback_for("Какая у вас зарплата?"), FALLBACK_RU);
        assert_eq!(p.fallback_for("What is your salary?"), FALLBACK_EN);
        assert_eq!(p.fallback_for("Қазақстан"), FALLBACK_RU);
        assert_eq!(p.fallback_for(""), FALLBACK_EN);
    }

    #[test]
    fn builtin_keys_are_unique_and_carry_language_rule() {
        let all = Persona::builtin();
        assert_eq!(all.len(), 2);
        assert_ne!(all[0].key, all[1].key);
        for p in &all {
            assert!(p.system_instruction.contains("на том языке, на котором задан вопрос"));
        }
    }

    #[test]
    fn recruiter_twin_keeps_fixed_parameters() {
        let p = Persona::recruiter_twin();
        assert!(p.system_instruction.contains("2 500 000 тенге в месяц"));
        assert!(p.system_instruction.contains("релокация в Дубай"));
    }
}
