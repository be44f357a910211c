use rand::seq::SliceRandom;
use rand::Rng;

const ANGER: &[&str] = &[
    "🔥 깊게 숨을 들이쉬고, 잠시 자리를 벗어나 보세요.",
    "💢 산책이나 가벼운 운동으로 마음을 풀어보세요.",
    "🌿 지금 느끼는 분노는 자연스러운 감정이에요. 천천히 가라앉힐 수 있어요.",
    "💧 따뜻한 물로 샤워하며 몸과 마음을 진정시켜보세요.",
    "☕ 좋아하는 음료 한 잔으로 잠시 여유를 가져보세요.",
    "🎧 음악을 들으며 기분을 환기해보세요.",
];

const ANXIETY: &[&str] = &[
    "🌿 명상이나 호흡 운동으로 마음의 긴장을 풀어보세요.",
    "💭 불안한 마음은 당신이 진지하게 노력하고 있다는 증거예요.",
    "☕ 따뜻한 차 한 잔과 함께 천천히 숨을 고르세요.",
    "🌤️ 오늘은 조금 천천히 살아도 괜찮아요.",
    "💬 지금의 불안은 영원하지 않아요. 곧 괜찮아질 거예요.",
    "🕊️ 걱정이 많을 땐 작은 일부터 하나씩 해보세요.",
];

const SADNESS: &[&str] = &[
    "💧 감정을 억누르지 말고 그대로 느껴보세요. 그것도 치유의 시작이에요.",
    "🎶 좋아하는 음악을 들으며 마음을 달래보세요.",
    "💬 누군가에게 솔직하게 털어놓는 것도 큰 도움이 될 거예요.",
    "🌙 슬픔은 당신이 깊이 느낄 줄 아는 사람이라는 증거예요.",
    "☀️ 따뜻한 햇살을 쬐며 스스로를 다독여주세요.",
    "🌷 오늘은 자신에게 조금 더 따뜻하게 대해주세요.",
];

const NORMAL: &[&str] = &[
    "🌤️ 오늘의 평온함을 소중히 간직하세요.",
    "🌱 지금의 안정된 마음이 내일의 힘이 될 거예요.",
    "☀️ 하루를 잘 보내고 있는 당신, 정말 멋져요.",
    "🌻 감사한 마음으로 자신을 칭찬해보세요.",
    "🍀 지금처럼 천천히, 편안하게 하루를 이어가세요.",
    "🌈 이 평온한 기분이 자주 찾아오길 바라요.",
];

const FALLBACK: &[&str] = &[
    "🌸 오늘도 충분히 잘하고 있어요.",
    "🌼 지금 이 순간을 있는 그대로 받아들이세요.",
];

/// Encouragement messages for an emotion name; unknown names get the fallback set.
pub fn messages_for(emotion: &str) -> &'static [&'static str] {
    match emotion {
        "Anger" => ANGER,
        "Anxiety" => ANXIETY,
        "Sadness" => SADNESS,
        "Normal" => NORMAL,
        _ => FALLBACK,
    }
}

pub fn pick_solution<R: Rng + ?Sized>(emotion: &str, rng: &mut R) -> String {
    messages_for(emotion)
        .choose(rng)
        .copied()
        .unwrap_or(FALLBACK[0])
        .to_string()
}

pub fn random_solution(emotion: &str) -> String {
    pick_solution(emotion, &mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::assessment::emotion::Emotion;

    #[test]
    fn test_every_emotion_has_six_messages() {
        for emotion in Emotion::ALL {
            assert_eq!(messages_for(emotion.as_str()).len(), 6, "{emotion}");
        }
    }

    #[test]
    fn test_unknown_emotion_uses_fallback() {
        assert_eq!(messages_for("Joy"), FALLBACK);
        let picked = random_solution("Joy");
        assert!(FALLBACK.contains(&picked.as_str()));
    }

    #[test]
    fn test_pick_comes_from_the_emotion_set() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let msg = pick_solution("Sadness", &mut rng);
            assert!(SADNESS.contains(&msg.as_str()));
        }
    }
}
