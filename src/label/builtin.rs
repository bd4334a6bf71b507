//! Layouts of the retail partners and carriers shipped with the extension.
//!
//! Each layout is a plain function from a display label to markup. Field values
//! go through [`DisplayLabel::text`] so they are escaped exactly once.
use crate::helpers::html::barcode_src;
use crate::label::display::DisplayLabel;
use crate::label::template::LabelTemplate;
use crate::label::template::TemplateRegistry;

/// Template backed by a compiled-in layout function.
pub(crate) struct BuiltinTemplate {
    class: &'static str,
    render: fn(&DisplayLabel) -> String,
}

impl LabelTemplate for BuiltinTemplate {
    fn class(&self) -> &str {
        self.class
    }

    fn render(&self, label: &DisplayLabel) -> String {
        (self.render)(label)
    }
}

/// Model name, CSS class and layout of every built-in template.
const BUILTINS: [(&str, &str, fn(&DisplayLabel) -> String); 11] = [
    ("Modèle AUC", "auchan", auchan),
    ("Modèle ORC", "orchestra", orchestra),
    ("Modèle AUB", "aubert", aubert),
    ("Modèle OXY", "oxybul", oxybul),
    ("Modèle FNA", "fnac", fnac),
    ("Modèle SMAL", "smallable", smallable),
    ("Modèle VERB", "verbaudet", verbaudet),
    ("Modèle SYS", "systemu", systemu),
    ("Modèle GALERIELAFAYETTE", "galerielafayette", galerie_lafayette),
    ("Modèle ADRESSE", "adresse", adresse),
    ("Modèle MAN", "manual", manual),
];

impl TemplateRegistry {
    /// Registry holding every built-in layout.
    pub(crate) fn builtin() -> Self {
        let mut registry = TemplateRegistry::empty();
        for (model, class, render) in BUILTINS {
            registry.register(model, Box::new(BuiltinTemplate { class, render }));
        }
        registry
    }
}

/// Shipper block printed on the Fnac and Galeries Lafayette labels.
const SHIPPER: &str = r#"<div id="partie-encadree">
  <img style="width: 29mm; height: 31mm;" src="./images/vulli_logo.jpg" alt="logo">
  <div id="informations">
    <p>VULLI S.A</p>
    <p>1 Avenue des Alpes</p>
    <p>74150 RUMILLY / FRANCE</p>
    <p>Tél. +33(0)450010620</p>
  </div>
</div>"#;

fn barcode(label: &DisplayLabel, options: &[(&str, &str)]) -> String {
    barcode_src(label.raw("barcode1"), label.raw("barcode1_type"), options)
}

fn auchan(label: &DisplayLabel) -> String {
    format!(
        r#"<div id="etiquette-auchan">
  <div id="informations">
    <p id="reference">{reference}</p>
    <p id="title">{designation}</p>
    <p id="code">Code Auchan <span>{tiers_ref}</span></p>
    <p id="nbrpieces">{pcb}<span>pièces</span></p>
  </div>
  <div id="barcode"><img src="{barcode}" alt="Code-barres"></div>
</div>"#,
        reference = label.text("ref"),
        designation = label.text("designation"),
        tiers_ref = label.text("tiers_ref"),
        pcb = label.text("pcb"),
        barcode = barcode(label, &[("multiplebarcodes", "true")]),
    )
}

fn orchestra(label: &DisplayLabel) -> String {
    let designation_size = if label.raw("designation").chars().count() < 16 { "16pt" } else { "12pt" };
    format!(
        r#"<div id="firstcont">
  <p><span class="caption">réf client:</span> <span class="value">{tiers_ref}</span></p>
  <p><span class="caption">Réf fournisseur:</span> <span class="value">{reference}</span></p>
  <div id="designation">
    <div class="caption">Désign</div>
    <div style="font-size: {designation_size};">{designation}</div>
  </div>
  <p><span class="caption">PCB</span> <span class="value">{pcb}</span> <span class="noun">{noun}</span></p>
</div>
<div id="secondcont">
  <p>N° du bon de commande <span>{order}</span></p>
  <p>ORIGINE : <span class="value">{origin}</span></p>
  <p>poids du colis <span class="value">{weight}</span> <span class="value">kg</span></p>
  <div id="barcode-orchestra"><img src="{barcode}" alt="Code-barres"></div>
</div>"#,
        tiers_ref = label.text("tiers_ref"),
        reference = label.text("ref"),
        designation = label.text("designation"),
        pcb = label.pcb_text(),
        noun = label.plurality.noun("pièce", "pièces"),
        order = label.text("pi_no_tiers"),
        origin = label.text("origin_country"),
        weight = label.weight_text(),
        barcode = barcode(
            label,
            &[
                ("multiplebarcodes", "true"),
                ("translate-esc", "true"),
                ("imagetype", "Jpg"),
                ("modulewidth", "0.20"),
                ("dpi", "203"),
                ("unit", "Mm"),
            ],
        ),
    )
}

fn aubert(label: &DisplayLabel) -> String {
    format!(
        r#"<div id="barcode"><img style="width: 82mm; height: 18.6mm;" src="{barcode}" alt="Code-barres"></div>"#,
        barcode = barcode(
            label,
            &[("multiplebarcodes", "true"), ("translate-esc", "true"), ("unit", "Mm"), ("modulewidth", "0.5")],
        ),
    )
}

fn oxybul(label: &DisplayLabel) -> String {
    format!(
        r#"<div id="templatefnaceveil">
  <p class="brand">EVEIL ET JEUX</p>
  <p class="my-class">France</p>
  <p class="my-class">NOM DU FOURNISSEUR : <span>{reference}</span></p>
  <p class="my-class">reference fournisseur : <span>{tiers_ref}</span></p>
  <p class="my-class">ean : <span>{ean}</span></p>
  <p class="my-class">LIBELLE PRODUIT : <span>{designation}</span></p>
  <p class="my-class">nombre de pieces <span>{packages}</span></p>
  <p class="my-class">poids du carton : <span>{weight}</span></p>
  <p class="my-class">commande n° : <span>{order}</span></p>
  <p class="my-class">CARTON N° : <span>{number}</span> partie de : <span>{packages}</span> colis</p>
</div>"#,
        reference = label.text("ref"),
        tiers_ref = label.text("tiers_ref"),
        ean = label.text("EAN13"),
        designation = label.text("designation"),
        packages = label.text("nb_colis_bp"),
        weight = label.text("weight"),
        order = label.text("pi_no_tiers"),
        number = label.number(),
    )
}

/// Store label with the shipper block, the reference and the "N/M" parcel counter.
fn store_label(label: &DisplayLabel, id: &str, store: &str) -> String {
    let margin = if label.count("nb_colis_bp") >= 100 { "87mm" } else { "90mm" };
    format!(
        r#"<div id="{id}">
{SHIPPER}
  <div class="store">
    <p>{store}</p>
    <p>REF : {reference}</p>
  </div>
  <p class="counter" style="margin-left: {margin};">{number}/{packages}</p>
</div>"#,
        reference = label.text("ref"),
        number = label.number(),
        packages = label.text("nb_colis_bp"),
    )
}

fn fnac(label: &DisplayLabel) -> String {
    store_label(label, "etiquettefnac", "Fnac")
}

fn galerie_lafayette(label: &DisplayLabel) -> String {
    store_label(label, "etiquettegalerielafayette", "GALERIES LAFAYETTE")
}

fn smallable(label: &DisplayLabel) -> String {
    format!(
        r#"<p id="smallable">SMALLABLE</p>
<p class="counter">COLIS n° <span>{number}</span> sur <span>{packages}</span></p>"#,
        number = label.number(),
        packages = label.text("nb_colis_bp"),
    )
}

fn verbaudet(label: &DisplayLabel) -> String {
    format!(
        r#"<div id="etiquetteverbaudet">
  <div id="exp-desti">
    <div><p>Expéditeur:</p><p>VULLI SAS</p><p>1 Avenue des Alpes</p><p>74150 RUMILLY</p></div>
    <div class="recipient"><p>Destinataire:</p><p>VERTBAUDET</p><p>12/14 Avenue industrielle</p><p>59520 MARQUETTE LEZ</p><p>LILLE</p></div>
  </div>
</div>
<div id="contttwo">
  <div id="num-colis">
    <p>numero de colis :</p><p>{number}</p>
    <p>nbre de colis :</p><p>{packages}</p>
  </div>
  <div id="ref-refproduit">
    <p>Réf . reference <span>{reference}</span></p>
    <div id="barcode"><img src="{barcode}" alt="Code-barres"></div>
  </div>
  <div id="date-envoi">
    <p>Date d'envoi</p>
    <p>{pcb} Pièces</p>
  </div>
</div>"#,
        number = label.number(),
        packages = label.text("nb_colis_bp"),
        reference = label.text("ref"),
        pcb = label.text("pcb"),
        barcode = barcode(label, &[("translate-esc", "true"), ("imagetype", "Svg"), ("rotation", "0")]),
    )
}

fn systemu(label: &DisplayLabel) -> String {
    format!(
        r#"<div id="etiquettesystem">
  <div id="firstrow">
    <div><p>Nom fournisseur</p><p>VULLI</p><p>1 Avenue des Alpes</p><p>74150 RUMILLY</p></div>
    <div class="classborder"><p>SYSTEM U</p><p>Vendéopôle - Haut bocage vendéen</p><p>Les Champs de Ray</p><p>85500 LES HERBIERS</p></div>
  </div>
  <div id="secondrow">
    <div id="firstcol">
      <p>désign : <span>{designation}</span></p>
      <p>Réf.fournisseur <span>{reference}</span></p>
      <p>PCB <span>{pcb}</span> <span>SPCB</span></p>
      <div class="ean"><p>EAN carton</p><img src="{barcode}" alt="Code-barres"></div>
    </div>
    <div id="l2col2">
      <p>colis n° {number} <span>sur</span> <span>{packages}</span></p>
      <p>Numéro présentation</p>
      <p>Numéro de bon de commande:</p>
      <p>Code produit national</p>
      <p>Composition du colis <span>TU</span></p>
      <p>Notion allotie <span>AL</span></p>
    </div>
  </div>
</div>"#,
        designation = label.text("designation"),
        reference = label.text("Reference"),
        pcb = label.text("pcb"),
        number = label.number(),
        packages = label.text("nb_colis_bp"),
        barcode = barcode(label, &[("multiplebarcodes", "true"), ("translate-esc", "true")]),
    )
}

fn adresse(label: &DisplayLabel) -> String {
    format!(
        r#"<div id="etiquetteadresse">
  <div id="partie-encadreeadresse">
    <img id="vulli-logo" src="./images/vulli_logo.jpg" alt="logo">
    <div id="informations"><p>VULLI S.A.S.</p><p>1 Avenue des Alpes</p><p>74150 RUMILLY FRANCE</p><p>Tél. +33(0)450010620</p></div>
  </div>
  <div class="address">
    <p>{name}</p>
    <p>{line1}</p>
    <p>{line2}</p>
    <p>{street}</p>
  </div>
  <div class="city">
    <p>{postcode} <span>{city}</span></p>
    <p>{country}</p>
  </div>
  <div class="counter"><b>{number}/{packages}</b></div>
</div>"#,
        name = label.text("adresse_nom"),
        line1 = label.text("adresse_adr1"),
        line2 = label.text("adresse_adr2"),
        street = label.text("adresse_rue"),
        postcode = label.text("adresse_cp"),
        city = label.text("adresse_ville"),
        country = label.text("adresse_pays"),
        number = label.number(),
        packages = label.text("nb_colis_or_man"),
    )
}

/// Manual labels print two identical halves on one sheet.
fn manual(label: &DisplayLabel) -> String {
    let half = format!(
        r#"<div class="subcontainer">
  <div class="informations">
    <p class="reference">Référence : {reference}</p>
    <p class="designation">{designation}</p>
    <div class="numbers"><p class="bn">BN: {bn}</p><p class="pcb">PCB: {pcb}</p></div>
  </div>
  <div id="barcode"><img style="height: 33.5mm; width: 90mm;" src="{barcode}" alt="Code-barres"></div>
</div>"#,
        reference = label.text("Reference"),
        designation = label.text("designation"),
        bn = label.text("manuel_bn"),
        pcb = label.text("pcb"),
        barcode = barcode_src(label.raw("barcode_manuel"), "GS1-128", &[("translate-esc", "true")]),
    );
    format!("{half}\n{half}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::assign_display_index;
    use crate::label::RenderedItem;
    use crate::summary::Item;

    fn label(index: usize, fields: &[(&str, &str)]) -> RenderedItem {
        let mut labels = assign_display_index(vec![Item::default(); index + 1]);
        let mut label = labels.remove(index);
        label.item = fields.iter().map(|(key, value)| (*key, *value)).collect();
        label
    }

    fn render(model: &str, label: &RenderedItem) -> String {
        let registry = TemplateRegistry::builtin();
        let template = registry.get(model).unwrap();
        template.render(&DisplayLabel::new(label, 10))
    }

    #[test]
    fn every_model_is_registered() {
        let registry = TemplateRegistry::builtin();
        for (model, class, _) in BUILTINS {
            assert_eq!(registry.get(model).map(|template| template.class()), Some(class));
        }
        assert!(registry.get("Modèle XYZ").is_none());
    }

    #[test]
    fn orchestra_normalizes_weight_and_noun() {
        let label = label(0, &[("weight", "12,5"), ("pcb", "1"), ("designation", "Hochet")]);
        let html = render("Modèle ORC", &label);
        assert!(html.contains("<span class=\"value\">12.5000</span>"));
        assert!(html.contains("<span class=\"noun\">pièce</span>"));
        assert!(html.contains("font-size: 16pt;"));
        assert_eq!(label.item.get("weight"), Some("12,5"));
    }

    #[test]
    fn orchestra_plural_and_long_designation() {
        let label = label(0, &[("pcb", "0"), ("designation", "Tapis d'éveil musical")]);
        let html = render("Modèle ORC", &label);
        assert!(html.contains("<span class=\"noun\">pièces</span>"));
        assert!(html.contains("font-size: 12pt;"));
        assert!(html.contains("Tapis d&#39;éveil musical"));
    }

    #[test]
    fn parcel_counter_uses_one_based_number() {
        let label = label(2, &[("nb_colis_bp", "5")]);
        assert!(render("Modèle SMAL", &label).contains("COLIS n° <span>3</span> sur <span>5</span>"));
        assert!(render("Modèle FNA", &label).contains(">3/5</p>"));
        assert!(render("Modèle SYS", &label).contains("colis n° 3 <span>sur</span> <span>5</span>"));
    }

    #[test]
    fn store_counter_margin_depends_on_parcel_count() {
        let small = label(0, &[("nb_colis_bp", "99")]);
        let large = label(0, &[("nb_colis_bp", "120")]);
        assert!(render("Modèle GALERIELAFAYETTE", &small).contains("margin-left: 90mm;"));
        assert!(render("Modèle GALERIELAFAYETTE", &large).contains("margin-left: 87mm;"));
    }

    #[test]
    fn address_counter_uses_manual_parcel_count() {
        let label = label(0, &[("adresse_nom", "Jouets & Cie"), ("nb_colis_or_man", "2")]);
        let html = render("Modèle ADRESSE", &label);
        assert!(html.contains("<p>Jouets &amp; Cie</p>"));
        assert!(html.contains("<b>1/2</b>"));
    }

    #[test]
    fn manual_label_prints_two_halves() {
        let label = label(0, &[("Reference", "R-1"), ("barcode_manuel", "(01)123")]);
        let html = render("Modèle MAN", &label);
        assert_eq!(html.matches("class=\"subcontainer\"").count(), 2);
        assert!(html.contains("data=%2801%29123&amp;code=GS1-128"));
    }

    #[test]
    fn barcode_uses_item_code() {
        let label = label(0, &[("barcode1", "3760123"), ("barcode1_type", "EAN13")]);
        assert!(render("Modèle AUB", &label).contains("data=3760123&amp;code=EAN13"));
        assert!(render("Modèle AUC", &label).contains("data=3760123&amp;code=EAN13&amp;multiplebarcodes=true"));
    }
}
