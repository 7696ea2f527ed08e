// src/common/lifecycle.rs
//
// Regras de ciclo de vida das entidades, como funções puras.
// Os serviços chamam estas funções imediatamente antes de persistir,
// em vez de depender de hooks implícitos do banco.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::fees::PlatformFee;

// Tetos fixos de capacidade de uma secretária
const MAX_COMPANIES_PER_SECRETARY: i32 = 50;
const MAX_SPECIALISTS_PER_SECRETARY: i32 = 30;

// A partir deste percentual a secretária para de aceitar novos vínculos
const OVERLOAD_THRESHOLD: i32 = 80;

// Percentual aplicado quando nenhuma faixa de preço cobre o valor
const DEFAULT_PLATFORM_FEE: i32 = 10;

/// Deriva o slug a partir do título: minúsculas, remove caracteres fora de
/// `[a-z0-9_]`/espaço/hífen, e colapsa espaços e hífens consecutivos em um
/// único hífen. Gerado uma única vez na criação; nunca regenerado depois.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.to_lowercase().chars() {
        let mapped = if c.is_ascii_alphanumeric() || c == '_' {
            Some(c)
        } else if c.is_whitespace() || c == '-' {
            Some('-')
        } else {
            None
        };
        if let Some(m) = mapped {
            if m == '-' && slug.ends_with('-') {
                continue; // colapsa sequências de hífens
            }
            slug.push(m);
        }
    }
    slug
}

/// `final_price = base + base * fee / 100`, com 2 casas decimais.
/// Recalculado sempre que o preço base ou a taxa mudam.
pub fn final_price(base_price: Decimal, platform_fee: Decimal) -> Decimal {
    (base_price + base_price * platform_fee / Decimal::from(100)).round_dp(2)
}

/// Média móvel ponderada: `(avg*n + nota) / (n+1)`, contador incrementa em 1.
/// O arredondamento para persistência fica a cargo do chamador.
pub fn apply_rating(average: Decimal, count: i32, new_rating: Decimal) -> (Decimal, i32) {
    let new_count = count + 1;
    let new_average = (average * Decimal::from(count) + new_rating) / Decimal::from(new_count);
    (new_average, new_count)
}

/// Percentual de carga de trabalho: `max(empresas/50, especialistas/30) * 100`.
pub fn workload_percentage(companies: i32, specialists: i32) -> Decimal {
    let company_pct =
        Decimal::from(companies) / Decimal::from(MAX_COMPANIES_PER_SECRETARY) * Decimal::from(100);
    let specialist_pct = Decimal::from(specialists) / Decimal::from(MAX_SPECIALISTS_PER_SECRETARY)
        * Decimal::from(100);
    company_pct.max(specialist_pct)
}

/// Flags de aceitação derivadas da carga: ambas caem juntas ao atingir 80%.
/// Deve ser reavaliada a cada mutação dos contadores.
pub fn recompute_availability(companies: i32, specialists: i32) -> (bool, bool) {
    let accepting = workload_percentage(companies, specialists) < Decimal::from(OVERLOAD_THRESHOLD);
    (accepting, accepting)
}

/// Decremento de contador com piso em zero.
pub fn clamp_decrement(count: i32) -> i32 {
    (count - 1).max(0)
}

/// Resolve o percentual de taxa da plataforma pela faixa `min <= preço <= max`.
/// Não achar faixa é lacuna operacional esperada: avisa e usa o padrão de 10%.
pub fn resolve_platform_fee(price: Decimal, tiers: &[PlatformFee]) -> Decimal {
    match tiers
        .iter()
        .find(|t| t.min_value <= price && price <= t.max_value)
    {
        Some(tier) => tier.platform_fee_percentage,
        None => {
            tracing::warn!(
                "⚠️ Nenhuma faixa de taxa cobre o preço {}, usando padrão de {}%",
                price,
                DEFAULT_PLATFORM_FEE
            );
            Decimal::from(DEFAULT_PLATFORM_FEE)
        }
    }
}

/// Anos completos entre duas datas, usando ano fixo de 365,25 dias.
/// Aproximação herdada do sistema original; sem tratamento calendário de
/// anos bissextos.
pub fn full_years_between(start: NaiveDate, today: NaiveDate) -> i32 {
    let days = (today - start).num_days();
    if days <= 0 {
        return 0;
    }
    (days as f64 / 365.25).floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fees::TierName;
    use chrono::Utc;
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn slug_strips_symbols_and_collapses_separators() {
        assert_eq!(slugify("Tax & Audit Review!!"), "tax-audit-review");
        assert_eq!(slugify("  Multiple   Spaces  "), "-multiple-spaces-");
        assert_eq!(slugify("Já--com---hífens"), "j-com-hfens");
        assert_eq!(slugify("snake_case OK"), "snake_case-ok");
    }

    #[test]
    fn final_price_adds_percentage_fee() {
        assert_eq!(final_price(dec("1000"), dec("10")), dec("1100.00"));
        assert_eq!(final_price(dec("1234.56"), dec("8.5")), dec("1339.50"));
        assert_eq!(final_price(dec("0"), dec("10")), dec("0.00"));
    }

    #[test]
    fn rating_running_mean_matches_arithmetic_mean() {
        let ratings = [dec("5"), dec("3"), dec("4"), dec("2"), dec("5")];
        let mut avg = Decimal::ZERO;
        let mut count = 0;
        for r in ratings {
            (avg, count) = apply_rating(avg, count, r);
        }
        assert_eq!(count, 5);
        assert_eq!(avg.round_dp(12), dec("3.8"));

        // Ordem de submissão não altera a média (a menos do resíduo de
        // precisão das divisões intermediárias)
        let mut avg2 = Decimal::ZERO;
        let mut count2 = 0;
        for r in [dec("5"), dec("5"), dec("4"), dec("3"), dec("2")] {
            (avg2, count2) = apply_rating(avg2, count2, r);
        }
        assert_eq!(avg.round_dp(12), avg2.round_dp(12));
    }

    #[test]
    fn workload_is_the_worse_of_the_two_ratios() {
        // 40/50 = 80%, 24/30 = 80%
        assert_eq!(workload_percentage(40, 24), dec("80"));
        // Lado das empresas domina
        assert_eq!(workload_percentage(25, 3), dec("50"));
        assert_eq!(workload_percentage(0, 0), Decimal::ZERO);
    }

    #[test]
    fn acceptance_flags_drop_exactly_at_eighty_percent() {
        assert_eq!(recompute_availability(39, 23), (true, true));
        assert_eq!(recompute_availability(40, 24), (false, false));
        assert_eq!(recompute_availability(50, 0), (false, false));
    }

    #[test]
    fn counter_decrement_never_goes_negative() {
        assert_eq!(clamp_decrement(1), 0);
        assert_eq!(clamp_decrement(0), 0);
        assert_eq!(clamp_decrement(10), 9);
    }

    fn tier(min: &str, max: &str, pct: &str) -> PlatformFee {
        let now = Utc::now();
        PlatformFee {
            id: Uuid::new_v4(),
            tier_name: TierName::Basic,
            min_value: dec(min),
            max_value: dec(max),
            platform_fee_percentage: dec(pct),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn fee_lookup_is_inclusive_on_both_ends() {
        let tiers = vec![tier("0", "1000", "10"), tier("1000.01", "5000", "8.5")];
        assert_eq!(resolve_platform_fee(dec("1000"), &tiers), dec("10"));
        assert_eq!(resolve_platform_fee(dec("1000.01"), &tiers), dec("8.5"));
        assert_eq!(resolve_platform_fee(dec("4999.99"), &tiers), dec("8.5"));
    }

    #[test]
    fn fee_lookup_falls_back_to_default_when_no_tier_matches() {
        let tiers = vec![tier("0", "1000", "7")];
        assert_eq!(resolve_platform_fee(dec("9999"), &tiers), dec("10"));
        assert_eq!(resolve_platform_fee(dec("500"), &[]), dec("10"));
    }

    #[test]
    fn full_years_uses_fixed_year_length() {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert_eq!(
            full_years_between(start, NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()),
            3
        );
        // Menos de um ano completo
        assert_eq!(
            full_years_between(start, NaiveDate::from_ymd_opt(2020, 12, 31).unwrap()),
            0
        );
        // Data futura em relação a "hoje"
        assert_eq!(
            full_years_between(start, NaiveDate::from_ymd_opt(2019, 1, 1).unwrap()),
            0
        );
    }
}
