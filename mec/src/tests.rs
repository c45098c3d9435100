use crate::prelude::*;
use crate::extractors::materials::{normalize_cohesion, unit_weight};
use crate::extractors::sets::SetExtractor;
use crate::extractors::stages::StageConfigExtractor;
use crate::util::decode_nasreal;

/// A small deck touching every category.
const DECK: &str = "\
$ sample deck
SOL 106
CEND
SUBTITLE = not the title
TITLE = Excavation check
SUBCASE 10
  LABEL = Stage A
  SOL 106
  LOAD = 5
  SPC = 3
  GEOPARM = 7
SUBCASE 20
  LABEL = Stage B
  USE(STAGE) = 10
  LOAD = 6
$ excavated zone
SET 1 = 1 THRU 100,
  200 THRU 300
SET 2 = 5
BEGIN BULK
PARAM, UNITS, M-N-J-SEC
PARAM, AUTOSPC, YES
PARAM, NLSEQUENTIAL, 1
NLPARM, 1, 10, , AUTO, 25, 1
STGCONF, 10, 1.0, , 0.5
STGCONF, 20, 2.0, 3.0, 4.0, 5.0, 6.0
GRID    1       0       0.0     0.0     0.0
GRID    2       0       1.0     0.0     0.0
CHEXA   1       12      1       2       3       4
CQUAD4  2       11      1       2       3       4
SPC1    3       123456  1
SPC1    3       123     2
SPC, 4, 1, 1
GRAV, 1, 0, 9.8, 0.0, 0.0, -9.8
PLOAD4, 2, 101, 1000.0
PLOAD4, 2, 102, 1200.0
LOAD, 5, 1.0, 1.0, 1, 1.0, 2 $ combined
$$ Name of Property [ID:11] <Wall>
$$ Type of Property <Shell>
$$ Thickness <0.5>
$$ Material ID <1>
PSHELL, 11, 1, 0.5
$$ Name of Property [ID:12] <Ground>
$$ Type of Property <Solid>
$$ Material ID <2>
PSOLID, 12, 2
$$ Name of Material [ID:1] <Sand>
$$ Type of Material <Mohr-Coulomb>
$$ Elastic Modulus <50000.0>
$$ Poisson's ratio <0.3>
$$ Mass density <2.0e-12>
$$ Cohesion <250.0>
$$ Frictional Angle <30.0>
MAT1, 1, 60000.0, , 0.35, 2.0e-12
$$ Name of Material [ID:2] <Rock>
$$ Type of Material <D-min>
$$ Poisson's ratio <0.25>
$$ Initial Poisson's Ratio <0.2>
$$ Initial Modulus of deformability <1.5e6>
$$ Critical Modulus of deformability <3.0e5>
$$ Critical Poisson's Ratio <0.45>
$$ Shear Strength <2.0e5>
$$ Tensile Strength <1.0e4>
$$ Frictional Angle <35.0>
$$ K0 <0.4>
MATGEO, 2, 1, 0.5, 0.5, 0.5, 0.0
$$ Name of Material [ID:3] <Clay>
$$ Type of Material <Mohr-Coulomb>
$$ Cohesion <50.0>
MATEP2H, 3, PERFECT, 25.0, PERFECT, 150.0, PERFECT, 0.0
ENDDATA
";

/// Parses a deck, panicking on failure.
fn parse(text: &str) -> Deck {
  return Deck::parse(text).expect("patterns should compile");
}

#[test]
fn test_decode_nasreal() {
  let epsilon = 1e-9_f64;
  let assert_near = |a: f64, b: f64| assert!((a - b).abs() < epsilon);
  let direct = |s: &str, f: f64| assert_near(decode_nasreal(s).unwrap(), f);
  let must_fail = |s: &str| assert_eq!(decode_nasreal(s), None);
  // ordinary syntax goes straight through
  for s in ["0", "1", "-0.25", ".25", "3.1415", "1e3", "2.5E-2", " 7.0 "] {
    direct(s, s.trim().parse().unwrap());
  }
  // nastran shorthand
  direct("2.1+5", 2.1e5);
  direct("1.-3", 1.0e-3);
  direct("-1.5-3", -1.5e-3);
  direct("+4.0+2", 400.0);
  direct("1.0D+3", 1000.0);
  direct("2.5d-1", 0.25);
  // now some bad cases
  must_fail("");
  must_fail("+");
  must_fail("-");
  must_fail(".");
  must_fail("e");
  must_fail("1.2.3");
  must_fail("abc");
  must_fail("-+3");
  must_fail("1.0-");
}

#[test]
fn empty_input_gives_empty_categories() {
  for text in ["", "\n\n", "$ nothing to see here\nBEGIN BULK\nENDDATA"] {
    let deck = parse(text);
    assert_eq!(deck, Deck::default());
    assert!(deck.materials.is_empty());
    assert!(deck.loads.gravity.is_empty());
    assert!(deck.boundary_conditions.usages.is_empty());
    assert_eq!(deck.model_info.nodes, 0);
    assert_eq!(deck.title, "");
  }
}

#[test]
fn parsing_is_idempotent() {
  let parser = DeckParser::new().unwrap();
  assert_eq!(parser.parse(DECK), parser.parse(DECK));
}

#[test]
fn parallel_parse_matches_sequential() {
  let parser = DeckParser::new().unwrap();
  assert_eq!(parser.parse_parallel(DECK), parser.parse(DECK));
  assert_eq!(parser.parse_parallel(""), parser.parse(""));
}

#[test]
fn end_to_end_scenario() {
  let text = "\
SUBCASE 10
  SOL 106
  LABEL = Stage A
  LOAD = 5
  SPC = 3
BEGIN BULK
GRAV, 1, 0, 0.0, 0.0, 1.0, -9.8
$$ Name of Material [ID:1] <Soil>
$$ Type of Material <Mohr-Coulomb>
$$ Cohesion <250>
$$ Frictional Angle <30>
";
  let deck = parse(text);
  assert_eq!(deck.subcases, vec![Subcase {
    id: 10,
    sol: Some(106),
    label: Some(String::from("Stage A")),
    load: Some(5),
    spc: Some(3),
    use_stage: None,
  }]);
  assert_eq!(deck.loads.gravity, vec![GravityLoad { id: 1, value: Some(9.8) }]);
  assert_eq!(deck.materials.len(), 1);
  assert_eq!(deck.materials[0].attributes.c, Some(0.25));
  assert_eq!(deck.materials[0].attributes.phi, Some(30.0));
}

#[test]
fn model_info_counts_leading_cards_only() {
  let deck = parse(DECK);
  assert_eq!(deck.model_info, ModelInfo { nodes: 2, elements: 2, spc_count: 2 });
  let text = "$ GRID 1\n GRID    2\nGRID    3\nXGRID   4\nCTETRA  1\nCTRIA3  2\n";
  let info = parse(text).model_info;
  assert_eq!(info.nodes, 1);
  assert_eq!(info.elements, 2);
  assert_eq!(info.spc_count, 0);
}

#[test]
fn title_and_params() {
  let deck = parse(DECK);
  assert_eq!(deck.title, "Excavation check");
  assert_eq!(deck.params.get(&SolverParam::Units).unwrap(), "M-N-J-SEC");
  assert_eq!(deck.params.get(&SolverParam::AutoSpc).unwrap(), "YES");
  assert_eq!(deck.params.get(&SolverParam::NlSequential).unwrap(), "1");
  assert!(!deck.params.contains_key(&SolverParam::AdjustElemShape));
  assert_eq!(deck.nlparams, vec![NlParam {
    id: 1,
    increments: 10,
    method: String::from("AUTO"),
    max_iterations: 25,
    convergence: 1,
  }]);
}

#[test]
fn subtitle_never_supplies_the_title() {
  assert_eq!(parse("SUBTITLE = sub\nTITLE = main\n").title, "main");
  assert_eq!(parse("SUBTITLE = sub\n").title, "");
}

#[test]
fn subcases_in_file_order() {
  let deck = parse(DECK);
  assert_eq!(deck.subcases.len(), 2);
  let second = &deck.subcases[1];
  assert_eq!(second.id, 20);
  assert_eq!(second.label.as_deref(), Some("Stage B"));
  assert_eq!(second.use_stage, Some(10));
  assert_eq!(second.load, Some(6));
  assert_eq!(second.sol, None);
  assert_eq!(second.spc, None);
}

#[test]
fn duplicate_subcases_are_kept() {
  let deck = parse("SUBCASE 1\n  LOAD = 1\nSUBCASE 1\n  LOAD = 2\n");
  let loads: Vec<Option<usize>> = deck.subcases.iter().map(|s| s.load).collect();
  assert_eq!(loads, vec![Some(1), Some(2)]);
  assert!(deck.subcases.iter().all(|s| s.id == 1));
}

#[test]
fn subcase_at_end_of_file() {
  let deck = parse("SUBCASE 3\n  LABEL = Last one  ");
  assert_eq!(deck.subcases.len(), 1);
  assert_eq!(deck.subcases[0].label.as_deref(), Some("Last one"));
}

#[test]
fn subcase_without_body_is_skipped() {
  let deck = parse("SUBCASE 3\nBEGIN BULK\n");
  assert!(deck.subcases.is_empty());
}

#[test]
fn gravity_is_never_negative() {
  let text = "\
GRAV, 1, 0, 0.0, 0.0, -1.0, -9.80665
GRAV, 2, 0, 0.0, 0.0, 1.0, 9.80665
GRAV, 3, 0, 0.0, 0.0, 1.0, -0.0
";
  let deck = parse(text);
  assert_eq!(deck.loads.gravity.len(), 3);
  for g in deck.loads.gravity.iter() {
    assert!(g.value.unwrap() >= 0.0);
  }
  assert_eq!(deck.loads.gravity[0].value, Some(9.80665));
}

#[test]
fn pressure_loads_aggregate_last_wins() {
  let text = "\
PLOAD4, 7, 1, 100.0
PLOAD4, 7, 2, 200.0
PLOAD4, 3, 9, 5.0
PLOAD4, 7, 3, 300.0
";
  let deck = parse(text);
  assert_eq!(deck.loads.pressure, vec![
    PressureLoad { id: 3, pressure: Some(5.0), count: 1 },
    PressureLoad { id: 7, pressure: Some(300.0), count: 3 },
  ]);
  assert_eq!(deck.loads.pressure_load(7).unwrap().count, 3);
}

#[test]
fn malformed_pressure_still_counts() {
  let deck = parse("PLOAD4, 8, 1, 50.0\nPLOAD4, 8, 2, 1.2.3\n");
  assert_eq!(deck.loads.pressure, vec![
    PressureLoad { id: 8, pressure: Some(50.0), count: 2 },
  ]);
}

#[test]
fn loads_from_sample_deck() {
  let deck = parse(DECK);
  assert_eq!(deck.loads.gravity, vec![GravityLoad { id: 1, value: Some(9.8) }]);
  assert_eq!(deck.loads.pressure, vec![
    PressureLoad { id: 2, pressure: Some(1200.0), count: 2 },
  ]);
  assert_eq!(deck.loads.combinations, vec![LoadCombination {
    id: 5,
    components: String::from("1.0, 1.0, 1, 1.0, 2"),
  }]);
}

#[test]
fn combinations_alone_are_loads() {
  let deck = parse("LOAD, 5, 1.0, 1.0, 1\n");
  assert_eq!(deck.loads.combinations.len(), 1);
  assert!(deck.loads.gravity.is_empty());
  assert!(deck.loads.pressure.is_empty());
  assert!(!deck.loads.is_empty());
  assert!(parse("").loads.is_empty());
}

#[test]
fn properties_and_joins() {
  let deck = parse(DECK);
  assert_eq!(deck.properties.len(), 2);
  let wall = deck.property(11).unwrap();
  assert_eq!(wall.name, "Wall");
  assert_eq!(wall.kind, PropertyKind::Shell);
  assert_eq!(wall.thickness, Some(0.5));
  assert_eq!(wall.material_id, Some(1));
  assert_eq!(deck.property_material(wall).unwrap().name, "Sand");
  let ground = deck.property(12).unwrap();
  assert_eq!(ground.kind, PropertyKind::Solid);
  assert_eq!(ground.thickness, None);
  assert_eq!(deck.property_material(ground).unwrap().name, "Rock");
  assert_eq!(deck.shell_properties().count(), 1);
  assert_eq!(deck.solid_properties().count(), 1);
}

#[test]
fn property_kinds() {
  assert_eq!(PropertyKind::from_tag("Beam"), PropertyKind::Beam);
  assert_eq!(PropertyKind::from_tag("Embedded Truss"), PropertyKind::EmbeddedTruss);
  let other = PropertyKind::from_tag("Interface");
  assert_eq!(other, PropertyKind::Other(String::from("Interface")));
  assert_eq!(other.to_string(), "Interface");
}

#[test]
fn property_without_material_reference() {
  let text = "\
$$ Name of Property [ID:5] <Free>
$$ Type of Property <Beam>
$$ Material ID <99>
";
  let deck = parse(text);
  assert_eq!(deck.properties[0].material_id, Some(99));
  assert!(deck.property_material(&deck.properties[0]).is_none());
}

#[test]
fn cohesion_normalization() {
  assert_eq!(normalize_cohesion(150.0), 0.15);
  assert_eq!(normalize_cohesion(50.0), 50.0);
  assert_eq!(normalize_cohesion(100.0), 100.0);
  assert_eq!(normalize_cohesion(250.0), 0.25);
}

#[test]
fn unit_weight_from_density() {
  assert_eq!(unit_weight(2000.0), 2000.0 * 9.80665e15);
  let deck = parse(DECK);
  let sand = deck.material(1).unwrap();
  assert_eq!(sand.attributes.gamma, Some(2.0e-12 * 9.80665e15));
}

#[test]
fn mat1_card_overrides_comments() {
  let deck = parse(DECK);
  let sand = deck.material(1).unwrap();
  assert_eq!(sand.attributes.e, Some(60000.0));
  assert_eq!(sand.attributes.nu, Some(0.35));
  assert_eq!(sand.attributes.c, Some(0.25));
  assert_eq!(sand.attributes.phi, Some(30.0));
  assert_eq!(sand.model(), MaterialModel::MohrCoulomb);
}

#[test]
fn mat1_card_for_another_id_is_ignored() {
  let text = "\
$$ Name of Material [ID:5] <Fill>
$$ Type of Material <elastic>
$$ Elastic Modulus <1000.0>
MAT1, 51, 9999.0, , 0.1, 0.0
";
  let deck = parse(text);
  assert_eq!(deck.materials[0].attributes.e, Some(1000.0));
  assert_eq!(deck.materials[0].attributes.nu, None);
  assert_eq!(deck.materials[0].model(), MaterialModel::Elastic);
}

#[test]
fn dmin_overrides_generic() {
  let deck = parse(DECK);
  let rock = deck.material(2).unwrap();
  let a = rock.attributes;
  assert_eq!(a.nu, Some(0.2));
  assert_eq!(a.nu0, Some(0.2));
  assert_eq!(a.e, Some(1.5e6));
  assert_eq!(a.e0, Some(1.5e6));
  assert_eq!(a.e_cr, Some(3.0e5));
  assert_eq!(a.nu_cr, Some(0.45));
  assert_eq!(a.tau_f, Some(2.0e5));
  assert_eq!(a.sigma_t, Some(1.0e4));
  assert_eq!(a.phi, Some(35.0));
  assert_eq!(a.c, None);
}

#[test]
fn matgeo_triple_overrides_k0() {
  let deck = parse(DECK);
  assert_eq!(deck.material(2).unwrap().attributes.k0, Some(0.5));
  let text = "\
$$ Name of Material [ID:4] <Silt>
$$ Type of Material <elastic>
$$ K0 <0.45>
MATGEO, 4, 1, 0.5, 0.6, 0.5, 0.5
";
  let deck = parse(text);
  assert_eq!(deck.materials[0].attributes.k0, Some(0.45));
}

#[test]
fn matep2h_overrides_mohr_coulomb_comments() {
  let deck = parse(DECK);
  let clay = deck.material(3).unwrap();
  assert_eq!(clay.attributes.phi, Some(25.0));
  assert_eq!(clay.attributes.c, Some(0.15));
  let text = "\
$$ Name of Material [ID:6] <Loam>
$$ Type of Material <Mohr-Coulomb>
$$ Cohesion <50.0>
$$ Frictional Angle <20.0>
MATEP2H, 6, PERFECT, 25.0
";
  // a single PERFECT value isn't enough to go on
  let deck = parse(text);
  assert_eq!(deck.materials[0].attributes.c, Some(50.0));
  assert_eq!(deck.materials[0].attributes.phi, Some(20.0));
}

#[test]
fn malformed_attribute_keeps_material() {
  let text = "\
$$ Name of Material [ID:7] <Odd>
$$ Type of Material <elastic>
$$ Elastic Modulus <n/a>
$$ Poisson's ratio <0.3>
";
  let deck = parse(text);
  assert_eq!(deck.materials.len(), 1);
  assert_eq!(deck.materials[0].attributes.e, None);
  assert_eq!(deck.materials[0].attributes.nu, Some(0.3));
}

#[test]
fn repeated_material_ids_are_kept() {
  let text = "\
$$ Name of Material [ID:1] <First>
$$ Type of Material <elastic>
$$ Name of Material [ID:1] <Second>
$$ Type of Material <elastic>
";
  let deck = parse(text);
  assert_eq!(deck.materials.len(), 2);
  assert_eq!(deck.material(1).unwrap().name, "First");
}

#[test]
fn oversized_ids_drop_their_record() {
  let text = "\
$$ Name of Material [ID:99999999999999999999] <Huge>
$$ Type of Material <elastic>
$$ Elastic Modulus <1000.0>
$$ Name of Material [ID:3] <Small>
$$ Type of Material <elastic>
SUBCASE 99999999999999999999
  LOAD = 1
SUBCASE 2
  LOAD = 2
";
  let deck = parse(text);
  let ids: Vec<usize> = deck.materials.iter().map(|m| m.id).collect();
  assert_eq!(ids, vec![3]);
  let ids: Vec<usize> = deck.subcases.iter().map(|s| s.id).collect();
  assert_eq!(ids, vec![2]);
}

#[test]
fn materials_grouped_by_type() {
  let deck = parse(DECK);
  let groups = deck.materials_by_type();
  let tags: Vec<&str> = groups.iter().map(|(t, _)| *t).collect();
  assert_eq!(tags, vec!["Mohr-Coulomb", "D-min"]);
  assert_eq!(groups[0].1.len(), 2);
  assert_eq!(deck.materials_of(MaterialModel::DMin).count(), 1);
}

#[test]
fn stage_configs() {
  let deck = parse(DECK);
  assert_eq!(deck.stage_configs.len(), 2);
  let first = deck.stage_config(10).unwrap();
  assert_eq!(first.params, [Some(1.0), None, Some(0.5), None]);
  let second = deck.stage_config(20).unwrap();
  assert_eq!(second.params, [Some(2.0), Some(3.0), Some(4.0), Some(5.0)]);
  assert_eq!(second.param(3), Some(5.0));
  assert_eq!(second.param(4), None);
  let bare = StageConfigExtractor::new().unwrap()
    .extract("STGCONF, 30\nSTGCONF, 40, abc, 2.0 $ note\n");
  assert_eq!(bare[0].params, [None; 4]);
  assert_eq!(bare[1].params, [None, Some(2.0), None, None]);
}

#[test]
fn geo_param_links() {
  let deck = parse(DECK);
  assert_eq!(deck.geo_params, vec![GeoParamLink { subcase: 10, geo_param: 7 }]);
  assert_eq!(deck.geo_param(10), Some(7));
  assert_eq!(deck.geo_param(20), None);
}

#[test]
fn set_definitions() {
  let deck = parse(DECK);
  assert_eq!(deck.sets, vec![
    SetDefinition {
      id: 1,
      comment: Some(String::from("excavated zone")),
      definition: String::from("1 THRU 100, 200 THRU 300"),
    },
    SetDefinition { id: 2, comment: None, definition: String::from("5") },
  ]);
  let sets = SetExtractor::new().unwrap().extract("$\n  SET 9 = ALL\n");
  assert_eq!(sets[0].comment, None);
  assert_eq!(sets[0].definition, "ALL");
}

#[test]
fn boundary_conditions() {
  let deck = parse(DECK);
  let bc = &deck.boundary_conditions;
  assert_eq!(bc.definitions, 3);
  assert_eq!(bc.set_ids, vec![3, 4]);
  assert_eq!(bc.usages, vec![SpcUsage { spc: 3, subcase: 10 }]);
}

#[test]
fn invalid_bytes_are_replaced() {
  let deck = Deck::from_bytes(b"TITLE = caf\xff\nGRID    1\n").unwrap();
  assert_eq!(deck.title, "caf\u{FFFD}");
  assert_eq!(deck.model_info.nodes, 1);
}

#[test]
fn number_format() {
  let nf = NumberFormat::default();
  assert_eq!(nf.format(0.0), "0");
  assert_eq!(nf.format(210000.0), "2.10×10^5");
  assert_eq!(nf.format(1000.0), "1.00×10^3");
  assert_eq!(nf.format(-2500.0), "-2.50×10^3");
  assert_eq!(nf.format(0.005), "5.00×10^-3");
  assert_eq!(nf.format(30.0), "30");
  assert_eq!(nf.format(0.35), "0.35");
  assert_eq!(nf.format(30.5), "30.5");
  assert_eq!(nf.format(0.123456), "0.123");
  assert_eq!(nf.format(999.0), "999");
  assert_eq!(nf.format_opt(None), "-");
  assert_eq!(nf.format_opt(Some(2.0)), "2");
  assert_eq!(nf.format_id(None), "-");
  assert_eq!(nf.format_id(Some(12)), "12");
  // rounding up carries into the exponent
  assert_eq!(nf.format(9999.6), "1.00×10^4");
  assert_eq!(nf.format(0.0099999), "1.00×10^-2");
  assert_eq!(nf.format(-9.996e-5), "-1.00×10^-4");
  // integers past i64 print in full when scientific notation is pushed up
  let wide = NumberFormat { upper: 1e30, ..NumberFormat::default() };
  assert_eq!(wide.format(1e20), "100000000000000000000");
}
